use std::fmt;
use std::str::FromStr;

/// Which clock face is mounted.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum ClockView {
    #[default]
    Analogue,
    Digital,
}

impl ClockView {
    pub fn as_str(self) -> &'static str {
        match self {
            ClockView::Analogue => "analogue",
            ClockView::Digital => "digital",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            ClockView::Analogue => ClockView::Digital,
            ClockView::Digital => ClockView::Analogue,
        }
    }
}

impl fmt::Display for ClockView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unrecognised view name.
#[derive(Debug, Clone, Eq, PartialEq, thiserror::Error)]
#[error("unknown clock view {0:?}")]
pub struct UnknownView(pub String);

impl FromStr for ClockView {
    type Err = UnknownView;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "analogue" => Ok(ClockView::Analogue),
            "digital" => Ok(ClockView::Digital),
            other => Err(UnknownView(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_forms_parse_back() {
        for v in [ClockView::Analogue, ClockView::Digital] {
            assert_eq!(v.as_str().parse::<ClockView>(), Ok(v));
        }
        assert!("Digital".parse::<ClockView>().is_err());
    }

    #[test]
    fn toggle_swaps() {
        assert_eq!(ClockView::Analogue.toggled(), ClockView::Digital);
        assert_eq!(ClockView::Digital.toggled(), ClockView::Analogue);
    }
}
