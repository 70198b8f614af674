use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::validation::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    Taste,
    Cleanliness,
    Price,
    Atmosphere,
}

impl Axis {
    pub const ALL: [Axis; 4] = [Axis::Taste, Axis::Cleanliness, Axis::Price, Axis::Atmosphere];

    pub fn key(&self) -> &'static str {
        match self {
            Axis::Taste => "taste",
            Axis::Cleanliness => "cleanliness",
            Axis::Price => "price",
            Axis::Atmosphere => "atmosphere",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A single 1-5 judgement. Values outside the range cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Score(u8);

impl Score {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for Score {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (Score::MIN as i64..=Score::MAX as i64).contains(&value) {
            Ok(Score(value as u8))
        } else {
            Err(format!(
                "{} is not a valid score, expected {}-{}",
                value,
                Score::MIN,
                Score::MAX
            ))
        }
    }
}

impl From<Score> for i64 {
    fn from(value: Score) -> Self {
        value.0 as i64
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One nullable score per axis. `None` means the axis could not be judged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RatingResult {
    pub taste: Option<Score>,
    pub cleanliness: Option<Score>,
    pub price: Option<Score>,
    pub atmosphere: Option<Score>,
}

impl RatingResult {
    pub fn get(&self, axis: Axis) -> Option<Score> {
        match axis {
            Axis::Taste => self.taste,
            Axis::Cleanliness => self.cleanliness,
            Axis::Price => self.price,
            Axis::Atmosphere => self.atmosphere,
        }
    }

    fn slot(&mut self, axis: Axis) -> &mut Option<Score> {
        match axis {
            Axis::Taste => &mut self.taste,
            Axis::Cleanliness => &mut self.cleanliness,
            Axis::Price => &mut self.price,
            Axis::Atmosphere => &mut self.atmosphere,
        }
    }

    pub fn with(mut self, axis: Axis, score: Option<Score>) -> Self {
        *self.slot(axis) = score;
        self
    }

    pub fn is_empty(&self) -> bool {
        Axis::ALL.iter().all(|axis| self.get(*axis).is_none())
    }

    /// Strictly decodes `{ "taste": .., "cleanliness": .., "price": .., "atmosphere": .. }`.
    ///
    /// Every key must be present. Each value must be `null` or an integral
    /// number in 1-5 (`4.0` is accepted, `3.5`, `"4"` and `6` are not).
    /// `path` is only used to name the offending location in errors.
    pub fn from_json_object(value: &Value, path: &str) -> Result<Self, ValidationError> {
        let object = value
            .as_object()
            .ok_or_else(|| ValidationError::NotAnObject {
                path: path.to_string(),
                value: value.clone(),
            })?;

        let mut rating = RatingResult::default();
        for axis in Axis::ALL {
            let key = format!("{}.{}", path, axis.key());
            let raw = object
                .get(axis.key())
                .ok_or_else(|| ValidationError::MissingKey(key.clone()))?;
            *rating.slot(axis) = score_from_json(raw, &key)?;
        }

        Ok(rating)
    }
}

fn score_from_json(raw: &Value, key: &str) -> Result<Option<Score>, ValidationError> {
    let invalid = || ValidationError::InvalidScore {
        key: key.to_string(),
        value: raw.clone(),
    };

    match raw {
        Value::Null => Ok(None),
        Value::Number(number) => {
            let integral = match number.as_i64() {
                Some(n) => n,
                None => {
                    let f = number.as_f64().ok_or_else(invalid)?;
                    if f.fract() != 0.0 {
                        return Err(invalid());
                    }
                    f as i64
                }
            };
            Score::try_from(integral).map(Some).map_err(|_| invalid())
        }
        _ => Err(invalid()),
    }
}
