use std::{collections::BTreeMap, convert::TryFrom, fmt};

use thiserror::Error;

/// Every option the tool understands.
///
/// Variant order is the order in which the formatter emits sentences, so the
/// model can be iterated deterministically regardless of how it was built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Arg {
    Api,
    Help,
    City,
    Cid,
    Gc,
    Z,
    Time,
    Sunrise,
    Sunset,
    Pressure,
    Cloud,
    Humidity,
    Wind,
    Temp,
}

impl Arg {
    /// Location selectors; exactly one must be chosen.
    pub const LOCATIONS: [Arg; 4] = [Arg::City, Arg::Cid, Arg::Gc, Arg::Z];

    pub fn as_str(&self) -> &'static str {
        match self {
            Arg::Api => "api",
            Arg::Help => "help",
            Arg::City => "city",
            Arg::Cid => "cid",
            Arg::Gc => "gc",
            Arg::Z => "z",
            Arg::Time => "time",
            Arg::Sunrise => "sunrise",
            Arg::Sunset => "sunset",
            Arg::Pressure => "pressure",
            Arg::Cloud => "cloud",
            Arg::Humidity => "humidity",
            Arg::Wind => "wind",
            Arg::Temp => "temp",
        }
    }

    pub const fn all() -> &'static [Arg] {
        &[
            Arg::Api,
            Arg::Help,
            Arg::City,
            Arg::Cid,
            Arg::Gc,
            Arg::Z,
            Arg::Time,
            Arg::Sunrise,
            Arg::Sunset,
            Arg::Pressure,
            Arg::Cloud,
            Arg::Humidity,
            Arg::Wind,
            Arg::Temp,
        ]
    }

    pub fn is_location(&self) -> bool {
        Self::LOCATIONS.contains(self)
    }

    /// Options that are meaningless without a value.
    pub fn takes_value(&self) -> bool {
        matches!(self, Arg::Api | Arg::City | Arg::Cid | Arg::Gc | Arg::Z)
    }
}

impl fmt::Display for Arg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Arg {
    type Error = ArgumentError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Arg::all()
            .iter()
            .copied()
            .find(|arg| arg.as_str() == value)
            .ok_or_else(|| ArgumentError::UnknownArg(value.to_string()))
    }
}

/// Raw value attached to an option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    /// Boolean flag, present without a value.
    Flag,
    Text(String),
}

impl ArgValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ArgValue::Text(s) => Some(s),
            ArgValue::Flag => None,
        }
    }
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        ArgValue::Text(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        ArgValue::Text(value)
    }
}

impl From<bool> for ArgValue {
    fn from(_: bool) -> Self {
        ArgValue::Flag
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArgumentError {
    #[error("[-help] should not be present with other arguments")]
    HelpNotAlone,

    #[error("Only one instance of [-city], [-cid], [-gc], or [-z] permitted")]
    TooManyLocations,

    #[error("One instance of [-city], [-cid], [-gc], or [-z] must be present")]
    MissingLocation,

    #[error("Only location and there is no chosen information e.g., time or temperature")]
    NoInformationRequested,

    #[error("No chosen information flags (e.g. [-time], [-sunrise], etc. See [-help]")]
    NoInformationFlags,

    #[error("Temperature must be in either celsius or fahrenheit! Got '{0}'")]
    InvalidTemperatureUnit(String),

    #[error("One of [-api] or [-help] must be present")]
    MissingApiKey,

    #[error("Coordinates must be entered as '[latitude],[longitude]', got '{0}'")]
    InvalidCoordinates(String),

    #[error("[-{0}] requires a value")]
    MissingValue(Arg),

    #[error("Unknown argument '{0}'")]
    UnknownArg(String),
}

/// Temperature unit accepted by `-temp`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
}

impl TemperatureUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "celsius",
            TemperatureUnit::Fahrenheit => "fahrenheit",
        }
    }

    /// Case-insensitive parse.
    pub fn parse(value: &str) -> Result<Self, ArgumentError> {
        match value.to_lowercase().as_str() {
            "celsius" => Ok(TemperatureUnit::Celsius),
            "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            _ => Err(ArgumentError::InvalidTemperatureUnit(value.to_string())),
        }
    }
}

/// The options given for a single invocation.
///
/// Only options the user actually supplied are stored; an absent key means
/// the option was not given at all.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArgumentModel {
    values: BTreeMap<Arg, ArgValue>,
}

impl ArgumentModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, used while translating parsed flags.
    pub fn with(mut self, arg: Arg, value: impl Into<ArgValue>) -> Self {
        self.values.insert(arg, value.into());
        self
    }

    /// Build a model from `(name, value)` pairs, rejecting unknown names.
    pub fn from_pairs<'a, I, V>(pairs: I) -> Result<Self, ArgumentError>
    where
        I: IntoIterator<Item = (&'a str, V)>,
        V: Into<ArgValue>,
    {
        pairs.into_iter().try_fold(Self::new(), |model, (name, value)| {
            Ok(model.with(Arg::try_from(name)?, value))
        })
    }

    pub fn contains(&self, arg: Arg) -> bool {
        self.values.contains_key(&arg)
    }

    pub fn get(&self, arg: Arg) -> Option<&ArgValue> {
        self.values.get(&arg)
    }

    /// Text value of an option; `None` when absent or a bare flag.
    pub fn text(&self, arg: Arg) -> Option<&str> {
        self.get(arg).and_then(ArgValue::as_text)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Options in canonical order.
    pub fn keys(&self) -> impl Iterator<Item = Arg> + '_ {
        self.values.keys().copied()
    }

    /// The single location selector, if exactly one is present.
    pub fn location(&self) -> Option<(Arg, &str)> {
        let mut found = Arg::LOCATIONS
            .iter()
            .filter_map(|arg| self.text(*arg).map(|value| (*arg, value)));

        match (found.next(), found.next()) {
            (Some(location), None) => Some(location),
            _ => None,
        }
    }

    /// Requested temperature unit. A `temp` flag without a value means celsius.
    pub fn temperature_unit(&self) -> Option<Result<TemperatureUnit, ArgumentError>> {
        self.get(Arg::Temp).map(|value| match value {
            ArgValue::Flag => Ok(TemperatureUnit::default()),
            ArgValue::Text(s) => TemperatureUnit::parse(s),
        })
    }

    /// Check that the combination of options makes sense.
    ///
    /// `help` is checked first and short-circuits everything else.
    pub fn validate(&self) -> Result<(), ArgumentError> {
        if self.contains(Arg::Help) {
            if self.len() > 1 {
                return Err(ArgumentError::HelpNotAlone);
            }
            return Ok(());
        }

        if let Some(arg) = self
            .values
            .iter()
            .find(|(arg, value)| arg.takes_value() && **value == ArgValue::Flag)
            .map(|(arg, _)| *arg)
        {
            return Err(ArgumentError::MissingValue(arg));
        }

        let locations = self.keys().filter(Arg::is_location).count();
        if locations > 1 {
            return Err(ArgumentError::TooManyLocations);
        }
        if locations == 0 {
            return Err(ArgumentError::MissingLocation);
        }

        if self.len() == 1 {
            return Err(ArgumentError::NoInformationRequested);
        }

        // api + location + nothing else
        if self.contains(Arg::Api) && self.len() < 3 {
            return Err(ArgumentError::NoInformationFlags);
        }

        if let Some(unit) = self.temperature_unit() {
            unit?;
        }

        Ok(())
    }
}
