use anyhow::Result;
use clap::{CommandFactory, Parser};
use tracing::debug;
use weather_core::{
    Arg, ArgumentModel, Config, FetchOutcome, HttpFetcher, RequestResult, WeatherFetcher,
    format_weather, synthesize,
};

const AFTER_HELP: &str = "Flags may be written with one or two leading dashes, e.g. -city or --city.";

/// Top-level CLI struct.
///
/// `-api` and `-help` exclusivity, and the location rules, are checked by
/// [`ArgumentModel::validate`] rather than by clap.
#[derive(Debug, Parser)]
#[command(
    name = "weather",
    about = "Weather Commands",
    after_help = AFTER_HELP,
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct Cli {
    /// The api key to access the weather. Mandatory if [help] is not present
    #[arg(long)]
    pub api: Option<String>,

    /// Display this help menu. Mandatory if [api] is not present
    #[arg(long)]
    pub help: bool,

    /// Uses a city name as the location. Enter '[city]' or '[city],[country code]'
    #[arg(long)]
    pub city: Option<String>,

    /// Uses a city ID as the location
    #[arg(long)]
    pub cid: Option<String>,

    /// Uses geographical coordinates as the location. Enter '[latitude],[longitude]'
    #[arg(long, allow_hyphen_values = true)]
    pub gc: Option<String>,

    /// Uses a zip as the location. Enter '[zip],[country code]' or it will default to US
    #[arg(long)]
    pub z: Option<String>,

    /// Display the temperature in [celsius] or [fahrenheit]. Default is celsius
    #[arg(long, num_args = 0..=1, default_missing_value = "celsius")]
    pub temp: Option<String>,

    /// Display the timezone
    #[arg(long)]
    pub time: bool,

    /// Display the pressure
    #[arg(long)]
    pub pressure: bool,

    /// Display the cloud levels
    #[arg(long)]
    pub cloud: bool,

    /// Display the humidity
    #[arg(long)]
    pub humidity: bool,

    /// Display the wind
    #[arg(long)]
    pub wind: bool,

    /// Display the sunset time
    #[arg(long)]
    pub sunset: bool,

    /// Display the sunrise time
    #[arg(long)]
    pub sunrise: bool,
}

/// Rewrite `-name` / `-name=value` into clap's `--name` form for every known option.
///
/// Anything else, including negative coordinates such as `-33.8,151.2`, is left alone.
pub fn normalize_args<I>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    args.into_iter()
        .enumerate()
        .map(|(idx, arg)| {
            if idx == 0 || arg.starts_with("--") {
                return arg;
            }

            match arg.strip_prefix('-') {
                Some(rest) => {
                    let name = rest.split_once('=').map_or(rest, |(name, _)| name);
                    if Arg::try_from(name).is_ok() {
                        format!("-{arg}")
                    } else {
                        arg
                    }
                }
                None => arg,
            }
        })
        .collect()
}

pub fn render_help() -> String {
    Cli::command().render_help().to_string()
}

impl Cli {
    /// Translate parsed flags into the model, keeping only what was given.
    ///
    /// `fallback_api_key` is used when neither `-api` nor `-help` was given.
    pub fn into_model(self, fallback_api_key: Option<&str>) -> ArgumentModel {
        let api = match (self.api, self.help) {
            (Some(key), _) => Some(key),
            (None, false) => fallback_api_key.map(str::to_string),
            (None, true) => None,
        };

        let texts = [
            (Arg::Api, api),
            (Arg::City, self.city),
            (Arg::Cid, self.cid),
            (Arg::Gc, self.gc),
            (Arg::Z, self.z),
            (Arg::Temp, self.temp),
        ];
        let flags = [
            (Arg::Help, self.help),
            (Arg::Time, self.time),
            (Arg::Pressure, self.pressure),
            (Arg::Cloud, self.cloud),
            (Arg::Humidity, self.humidity),
            (Arg::Wind, self.wind),
            (Arg::Sunset, self.sunset),
            (Arg::Sunrise, self.sunrise),
        ];

        let model = texts
            .into_iter()
            .filter_map(|(arg, value)| value.map(|v| (arg, v)))
            .fold(ArgumentModel::new(), |model, (arg, value)| model.with(arg, value));

        flags
            .into_iter()
            .filter(|(_, given)| *given)
            .fold(model, |model, (arg, given)| model.with(arg, given))
    }

    fn needs_configured_key(&self) -> bool {
        self.api.is_none() && !self.help
    }

    pub async fn run(self) -> Result<()> {
        let config = if self.needs_configured_key() {
            Config::load()?
        } else {
            Config::default()
        };

        let model = self.into_model(config.api_key());
        let text = execute(&HttpFetcher::new(), &model).await?;
        println!("{text}");

        Ok(())
    }
}

/// Synthesize, fetch and render. Validation errors and help come back as text.
pub async fn execute(fetcher: &dyn WeatherFetcher, model: &ArgumentModel) -> Result<String> {
    match synthesize(model, render_help) {
        RequestResult::Success(url) => {
            let outcome = fetcher.fetch(&url).await?;
            render_outcome(outcome, model)
        }
        RequestResult::Error(text) | RequestResult::Help(text) => Ok(text),
    }
}

fn render_outcome(outcome: FetchOutcome, model: &ArgumentModel) -> Result<String> {
    let text = match outcome {
        FetchOutcome::Weather(body) => format_weather(&body, model)?,
        FetchOutcome::BadApiKey => "The api key is invalid!".to_string(),
        FetchOutcome::LocationUnknown => "The location entered cannot be found!".to_string(),
        FetchOutcome::Unclassified(status) => {
            debug!(status, "reporting unclassified status");
            "A value was entered incorrectly".to_string()
        }
    };

    Ok(text)
}
