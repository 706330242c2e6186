//! Effect kinds that can be rendered onto a timeline segment

use serde::{Deserialize, Serialize};

/// Closed set of effects a render job can apply
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Effect {
    ColorGrade,
    Blur,
    Trim,
    SpeedChange,
    Transition,
}

impl Effect {
    /// Every effect kind, in declaration order
    pub const ALL: [Effect; 5] = [
        Effect::ColorGrade,
        Effect::Blur,
        Effect::Trim,
        Effect::SpeedChange,
        Effect::Transition,
    ];

    /// Wire name (`color_grade`, `speed_change`, ...)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ColorGrade => "color_grade",
            Self::Blur => "blur",
            Self::Trim => "trim",
            Self::SpeedChange => "speed_change",
            Self::Transition => "transition",
        }
    }
}

impl std::fmt::Display for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Effect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept kebab-case too so CLI users can type `speed-change`
        let normalized = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|effect| effect.as_str() == normalized)
            .ok_or_else(|| format!("Unknown effect: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effect_display_matches_serde() {
        for effect in Effect::ALL {
            let json = serde_json::to_string(&effect).unwrap();
            assert_eq!(json, format!("\"{}\"", effect));
        }
    }

    #[test]
    fn test_effect_parse() {
        assert_eq!("color_grade".parse::<Effect>().unwrap(), Effect::ColorGrade);
        assert_eq!("Speed-Change".parse::<Effect>().unwrap(), Effect::SpeedChange);
        assert_eq!(" blur ".parse::<Effect>().unwrap(), Effect::Blur);
        assert!("sharpen".parse::<Effect>().is_err());
    }
}
