use std::process::ExitCode;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use weather_core::{
    Config, FixedPosition, HtmlRenderer, Position, Renderer, Surface, TemperatureUnit,
    TextRenderer, View, WeatherProvider, WeatherWidget, provider::provider_from_config,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather", version, about = "Weather widget")]
pub struct Cli {
    /// Log at debug level (RUST_LOG overrides).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the provider API key in the config file.
    Configure,

    /// Show the weather card for a city.
    Show {
        /// City name, e.g. "London" or "Paris,FR".
        city: String,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Show the weather card for a coordinate pair.
    Locate {
        #[arg(long, allow_hyphen_values = true, requires = "lon")]
        lat: Option<f64>,

        #[arg(long, allow_hyphen_values = true, requires = "lat")]
        lon: Option<f64>,

        #[command(flatten)]
        display: DisplayArgs,
    },

    /// Run the HTTP proxy.
    Serve {
        /// Bind address, e.g. 0.0.0.0:8080.
        #[arg(long)]
        listen: Option<String>,
    },
}

#[derive(Debug, Args)]
pub struct DisplayArgs {
    /// Show temperatures in Fahrenheit.
    #[arg(long, short = 'f')]
    fahrenheit: bool,

    /// Print the card in both units.
    #[arg(long, conflicts_with = "fahrenheit")]
    both: bool,

    /// Print HTML markup instead of text.
    #[arg(long)]
    html: bool,
}

impl DisplayArgs {
    fn unit(&self, config: &Config) -> TemperatureUnit {
        TemperatureUnit::from_celsius_flag(!(self.fahrenheit || config.fahrenheit))
    }

    fn renderer(&self) -> Box<dyn Renderer> {
        if self.html { Box::new(HtmlRenderer) } else { Box::new(TextRenderer) }
    }
}

/// Prints views as they arrive; placeholders go to stderr.
struct Terminal {
    renderer: Box<dyn Renderer>,
}

impl Surface for Terminal {
    fn show(&mut self, view: View) {
        let out = self.renderer.render(&view);
        match view {
            View::Loading | View::Locating | View::Error(_) => eprintln!("{out}"),
            View::Weather(_) => println!("{out}"),
        }
    }
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<ExitCode> {
        // Environment overrides apply to this run only; `configure` writes back the file view.
        let file_config = Config::load()?;
        let mut config = file_config.with_env();

        match self.command {
            Command::Configure => {
                configure(file_config)?;
                Ok(ExitCode::SUCCESS)
            }
            Command::Show { city, display } => {
                let mut widget = widget(&config, &display)?;
                let view = show_city(&mut widget, &city, display.both).await;
                Ok(exit_code(&view))
            }
            Command::Locate { lat, lon, display } => {
                let mut widget = widget(&config, &display)?;
                if let (Some(latitude), Some(longitude)) = (lat, lon) {
                    widget =
                        widget.with_geolocator(Box::new(FixedPosition(Position { latitude, longitude })));
                }

                let view = show_location(&mut widget, display.both).await;
                Ok(exit_code(&view))
            }
            Command::Serve { listen } => {
                if listen.is_some() {
                    config.listen = listen;
                }
                weather_proxy::serve(&config).await?;
                Ok(ExitCode::SUCCESS)
            }
        }
    }
}

/// Fetch `city`; with `both`, redraw the card once more in the other unit.
async fn show_city<P: WeatherProvider, S: Surface>(
    widget: &mut WeatherWidget<P, S>,
    city: &str,
    both: bool,
) -> View {
    widget.set_input(city);
    let view = widget.fetch_weather(None).await;
    if both && matches!(view, View::Weather(_)) {
        widget.toggle_unit();
    }
    view
}

async fn show_location<P: WeatherProvider, S: Surface>(
    widget: &mut WeatherWidget<P, S>,
    both: bool,
) -> View {
    let view = widget.get_current_location().await;
    if both && matches!(view, View::Weather(_)) {
        widget.toggle_unit();
    }
    view
}

fn widget(
    config: &Config,
    display: &DisplayArgs,
) -> anyhow::Result<WeatherWidget<weather_core::OpenWeatherProvider, Terminal>> {
    let provider = provider_from_config(config)?;
    let terminal = Terminal { renderer: display.renderer() };
    Ok(WeatherWidget::new(provider, terminal).with_unit(display.unit(config)))
}

fn exit_code(view: &View) -> ExitCode {
    match view {
        View::Error(_) => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    }
}

fn configure(config: Config) -> anyhow::Result<()> {
    let api_key = inquire::Password::new("OpenWeather API key:")
        .without_confirmation()
        .with_help_message("Create one at https://home.openweathermap.org/api_keys")
        .prompt()
        .context("Failed to read API key")?;

    let fahrenheit = inquire::Confirm::new("Show temperatures in Fahrenheit by default?")
        .with_default(config.fahrenheit)
        .prompt()
        .context("Failed to read unit preference")?;

    let path = apply_answers(config, &api_key, fahrenheit)?.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

/// Fold the prompt answers into the on-disk config.
fn apply_answers(mut config: Config, api_key: &str, fahrenheit: bool) -> anyhow::Result<Config> {
    let api_key = api_key.trim();
    if api_key.is_empty() {
        anyhow::bail!("API key must not be empty");
    }
    config.set_api_key(api_key.to_string());
    config.fahrenheit = fahrenheit;
    Ok(config)
}
