use strum::EnumIter;

use crate::score::{MAX_SCORE, Score};


// Battery icon shown next to a team. Higher level means fuller battery.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, EnumIter)]
pub enum BatteryLevel {
    Empty,
    Low,
    Half,
    High,
    Full,
}

impl BatteryLevel {
    // Thresholds: exactly 100 is full; >= 70 high; >= 50 half; > 25 low; everything else empty.
    // Note that scores above 100 are shown as `High`, not `Full`.
    pub fn for_score(score: Score) -> Self {
        if score == MAX_SCORE {
            BatteryLevel::Full
        } else if score >= 70 {
            BatteryLevel::High
        } else if score >= 50 {
            BatteryLevel::Half
        } else if score > 25 {
            BatteryLevel::Low
        } else {
            BatteryLevel::Empty
        }
    }

    pub fn icon_index(self) -> u8 {
        match self {
            BatteryLevel::Empty => 0,
            BatteryLevel::Low => 1,
            BatteryLevel::Half => 2,
            BatteryLevel::High => 3,
            BatteryLevel::Full => 4,
        }
    }

    pub fn icon_path(self) -> String { format!("Images/battery-{}.png", self.icon_index()) }
}

pub fn battery_icon(score: Score) -> String { BatteryLevel::for_score(score).icon_path() }
