use ratatui::style::Color;

/// Trigger city tier, classified from the dataset's free-form tier label
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Tier {
    One,
    Two,
    Three,
    Four,
    /// Any label that isn't one of the four recognized tiers
    Unknown,
}

/// Visual bucket for a tier: marker layer color, legend swatch, popup pill
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierStyle {
    pub color: Color,
    pub swatch: char,
    pub pill: &'static str,
}

impl Tier {
    /// Recognized tiers in legend order
    pub const KNOWN: [Tier; 4] = [Tier::One, Tier::Two, Tier::Three, Tier::Four];

    /// Classify a tier label. Total: unrecognized labels map to `Unknown`.
    pub fn classify(label: &str) -> Self {
        match label.trim() {
            "Tier 1" => Tier::One,
            "Tier 2" => Tier::Two,
            "Tier 3" => Tier::Three,
            "Tier 4" => Tier::Four,
            _ => Tier::Unknown,
        }
    }

    pub fn style(self) -> TierStyle {
        match self {
            Tier::One => TierStyle {
                color: Color::LightRed,
                swatch: '●',
                pill: "TIER 1",
            },
            Tier::Two => TierStyle {
                color: Color::LightYellow,
                swatch: '●',
                pill: "TIER 2",
            },
            Tier::Three => TierStyle {
                color: Color::LightGreen,
                swatch: '●',
                pill: "TIER 3",
            },
            Tier::Four => TierStyle {
                color: Color::LightBlue,
                swatch: '●',
                pill: "TIER 4",
            },
            Tier::Unknown => TierStyle {
                color: Color::Gray,
                swatch: '○',
                pill: "UNTIERED",
            },
        }
    }

    /// Short legend label
    pub fn label(self) -> &'static str {
        match self {
            Tier::One => "Tier 1",
            Tier::Two => "Tier 2",
            Tier::Three => "Tier 3",
            Tier::Four => "Tier 4",
            Tier::Unknown => "Unknown",
        }
    }

    /// Slot for per-tier arrays (marker layers, counts)
    pub fn index(self) -> usize {
        match self {
            Tier::One => 0,
            Tier::Two => 1,
            Tier::Three => 2,
            Tier::Four => 3,
            Tier::Unknown => 4,
        }
    }

    /// Tier for a number key ('1'..='4')
    pub fn from_digit(digit: char) -> Option<Self> {
        match digit {
            '1' => Some(Tier::One),
            '2' => Some(Tier::Two),
            '3' => Some(Tier::Three),
            '4' => Some(Tier::Four),
            _ => None,
        }
    }
}

/// Number of tier slots including `Unknown`
pub const TIER_SLOTS: usize = 5;
