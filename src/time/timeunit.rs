use crate::time::error::Error;
use core::str::FromStr;
use lazy_static::*;
use regex::Regex;

lazy_static! {
    static ref DURATION_REGEX: Regex = Regex::new(
        r"^\s*(?P<value>\d+)\s*(?P<unit>[a-z]*)\s*$"
    )
    .expect("Regex compilation error");
}

/// A whole number of time units. A bare number is read as seconds, which is
/// the unit cache times are configured in.
#[derive(Debug, PartialEq)]
pub struct DurationUnit {
    value: u64,
    unit: TimeUnit,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimeUnit {
    Second,
    Minute,
    Hour,
    Day,
}

impl TimeUnit {
    fn seconds(self) -> u64 {
        match self {
            TimeUnit::Second => 1,
            TimeUnit::Minute => 60,
            TimeUnit::Hour => 60 * 60,
            TimeUnit::Day => 60 * 60 * 24,
        }
    }
}

impl DurationUnit {
    /// `None` when the duration does not fit into `u64` seconds.
    pub fn as_secs(&self) -> Option<u64> {
        self.value.checked_mul(self.unit.seconds())
    }
}

impl FromStr for DurationUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_lowercase();
        let caps = DURATION_REGEX.captures(&lowered).ok_or_else(|| {
            Error::Syntax(format!("'{}' is not a duration like 90, 90s or 15m", s))
        })?;
        let value = caps["value"]
            .parse()
            .map_err(|_| Error::Syntax(format!("'{}' is out of range", s)))?;
        let unit = match &caps["unit"] {
            "" => TimeUnit::Second,
            unit => unit.parse()?,
        };
        Ok(Self { value, unit })
    }
}


impl FromStr for TimeUnit {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "s" | "sec" | "secs" | "second" | "seconds" => Ok(TimeUnit::Second),
            "m" | "min" | "mins" | "minute" | "minutes" => Ok(TimeUnit::Minute),
            "h" | "hour" | "hours" => Ok(TimeUnit::Hour),
            "d" | "day" | "days" => Ok(TimeUnit::Day),
            _ => Err(Error::UnitNotSupported(format!("Unit '{}' not supported", s))),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::time::error::Error;
    use crate::time::timeunit::DurationUnit;
    use crate::time::timeunit::TimeUnit;

    #[test]
    fn test_building_time_unit_from_string() {
        assert_eq!("s".parse::<TimeUnit>(), Ok(TimeUnit::Second));
        assert_eq!("mins".parse::<TimeUnit>(), Ok(TimeUnit::Minute));
        assert_eq!("h".parse::<TimeUnit>(), Ok(TimeUnit::Hour));
        assert_eq!("days".parse::<TimeUnit>(), Ok(TimeUnit::Day));
        assert!(matches!(
            "ms".parse::<TimeUnit>(),
            Err(Error::UnitNotSupported(_))
        ));
    }

    #[test]
    fn test_bare_number_is_seconds() {
        let unit = "960".parse::<DurationUnit>().unwrap();
        assert_eq!(unit.as_secs(), Some(960));
    }

    #[test]
    fn test_units_scale_to_seconds() {
        assert_eq!("15m".parse::<DurationUnit>().unwrap().as_secs(), Some(900));
        assert_eq!(" 2H ".parse::<DurationUnit>().unwrap().as_secs(), Some(7200));
    }

    #[test]
    fn test_overflowing_duration_has_no_seconds() {
        let unit = "300000000000000000d".parse::<DurationUnit>().unwrap();
        assert_eq!(unit.as_secs(), None);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!("soon".parse::<DurationUnit>(), Err(Error::Syntax(_))));
        assert!(matches!("-5".parse::<DurationUnit>(), Err(Error::Syntax(_))));
    }
}
