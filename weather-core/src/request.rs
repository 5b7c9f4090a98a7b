use tracing::debug;

use crate::args::{Arg, ArgumentError, ArgumentModel};

/// Current-weather endpoint; query parameters are appended verbatim.
pub const BASE_URL: &str = "http://api.openweathermap.org/data/2.5/weather?";

/// Prefix put in front of every validation message.
pub const ERROR_PREFIX: &str = "ERROR: ";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestResult {
    Success(String),
    Error(String),
    Help(String),
}

impl From<ArgumentError> for RequestResult {
    fn from(err: ArgumentError) -> Self {
        RequestResult::Error(format!("{ERROR_PREFIX}{err}"))
    }
}

/// Turn a model into the URL to fetch, or into the help/error text to print.
///
/// `help` renders the usage text and is only invoked when `-help` was given.
pub fn synthesize(model: &ArgumentModel, help: impl FnOnce() -> String) -> RequestResult {
    if let Err(err) = model.validate() {
        debug!(%err, "argument validation failed");
        return err.into();
    }

    if model.contains(Arg::Help) {
        return RequestResult::Help(help());
    }

    match build_url(model) {
        Ok(url) => {
            debug!(url = %redact(&url), "synthesized request");
            RequestResult::Success(url)
        }
        Err(err) => err.into(),
    }
}

fn build_url(model: &ArgumentModel) -> Result<String, ArgumentError> {
    let api_key = model.text(Arg::Api).ok_or(ArgumentError::MissingApiKey)?;
    let (arg, value) = model.location().ok_or(ArgumentError::MissingLocation)?;

    let location = match arg {
        Arg::Gc => {
            let (lat, lon) = value
                .split_once(',')
                .ok_or_else(|| ArgumentError::InvalidCoordinates(value.to_string()))?;
            format!("lat={lat}&lon={lon}")
        }
        Arg::Cid => format!("id={value}"),
        Arg::Z => format!("zip={value}"),
        _ => format!("q={value}"),
    };

    Ok(format!("{BASE_URL}{location}&APPID={api_key}"))
}

/// Hide the API key when logging a URL.
fn redact(url: &str) -> String {
    match url.split_once("&APPID=") {
        Some((head, _)) => format!("{head}&APPID=***"),
        None => url.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_help() -> String {
        panic!("help should not be rendered")
    }

    fn base() -> ArgumentModel {
        ArgumentModel::new().with(Arg::Api, "test").with(Arg::Time, true)
    }

    #[test]
    fn city_id_url() {
        let m = base().with(Arg::Cid, "5");
        assert_eq!(
            synthesize(&m, no_help),
            RequestResult::Success(
                "http://api.openweathermap.org/data/2.5/weather?id=5&APPID=test".into()
            )
        );
    }

    #[test]
    fn location_clauses() {
        let cases = [
            (Arg::City, "London,uk", "q=London,uk"),
            (Arg::Z, "94040,us", "zip=94040,us"),
            (Arg::Gc, "35,139", "lat=35&lon=139"),
            (Arg::Gc, "-33.8,151.2", "lat=-33.8&lon=151.2"),
        ];

        for (arg, value, clause) in cases {
            let m = base().with(arg, value);
            let expected = format!("{BASE_URL}{clause}&APPID=test");
            assert_eq!(synthesize(&m, no_help), RequestResult::Success(expected));
        }
    }

    #[test]
    fn missing_location_is_error() {
        let m = ArgumentModel::new().with(Arg::Api, "test");
        match synthesize(&m, no_help) {
            RequestResult::Error(msg) => assert!(msg.starts_with("ERROR")),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[test]
    fn help_is_rendered() {
        let m = ArgumentModel::new().with(Arg::Help, true);
        assert_eq!(
            synthesize(&m, || "usage".to_string()),
            RequestResult::Help("usage".into())
        );
    }

    #[test]
    fn help_with_other_args_is_error() {
        let m = ArgumentModel::new().with(Arg::Help, true).with(Arg::Cid, "TEST");
        assert_eq!(
            synthesize(&m, no_help),
            RequestResult::from(ArgumentError::HelpNotAlone)
        );
    }

    #[test]
    fn missing_api_key_is_error() {
        let m = ArgumentModel::new().with(Arg::City, "Paris").with(Arg::Wind, true);
        assert_eq!(
            synthesize(&m, no_help),
            RequestResult::Error(format!("{ERROR_PREFIX}{}", ArgumentError::MissingApiKey))
        );
    }

    #[test]
    fn coordinates_without_comma_is_error() {
        let m = base().with(Arg::Gc, "35");
        assert!(matches!(synthesize(&m, no_help), RequestResult::Error(_)));
    }

    #[test]
    fn redact_hides_key() {
        assert_eq!(redact("http://x?q=a&APPID=secret"), "http://x?q=a&APPID=***");
    }
}
