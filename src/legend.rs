//! Heatmap legend
use crate::{
    color::{map_relative, Rgb, NEUTRAL_RATIO},
    prelude::Signal,
    store::SignalRange,
};

/// One legend swatch
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct LegendEntry {
    /// Reading this swatch stands for
    pub level: i32,
    /// Swatch color
    pub color: Rgb,
}

impl std::fmt::Display for LegendEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} dBm", self.level)
    }
}

/// Legend of `length` entries evenly subdividing the range of valid
/// readings, from strongest (green) to weakest (red). Colors match the
/// raster gradient. Empty when there is no valid reading.
pub fn legend<I: IntoIterator<Item = Signal>>(signals: I, length: usize) -> Vec<LegendEntry> {
    match SignalRange::from_signals(signals) {
        Some(range) => legend_of(&range, length),
        None => Vec::new(),
    }
}

/// Legend for a known range
pub fn legend_of(range: &SignalRange, length: usize) -> Vec<LegendEntry> {
    let steps = length.saturating_sub(1).max(1) as f64;
    (0..length)
        .map(|i| {
            let ratio = i as f64 / steps;
            if range.is_degenerate() {
                LegendEntry {
                    level: range.max,
                    color: map_relative(NEUTRAL_RATIO),
                }
            } else {
                let span = (range.min as i64 - range.max as i64) as f64;
                LegendEntry {
                    // within [min, max]: fits back into i32
                    level: (range.max as i64 + (span * ratio) as i64) as i32,
                    color: map_relative(ratio),
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::{legend, LegendEntry};
    use crate::{color::Rgb, prelude::Signal};

    #[test]
    fn no_data() {
        assert!(legend([], 5).is_empty());
        assert!(legend([Signal::NoSignal, Signal::NoSignal], 5).is_empty());
    }

    #[test]
    fn single_value() {
        let entries = legend([Signal::Level(-55), Signal::Level(-55), Signal::NoSignal], 5);
        assert_eq!(entries.len(), 5);
        for entry in entries {
            assert_eq!(
                entry,
                LegendEntry {
                    level: -55,
                    color: Rgb::ORANGE,
                }
            );
        }
    }

    #[test]
    fn subdivision() {
        let entries = legend(
            [
                Signal::Level(-80),
                Signal::NoSignal,
                Signal::Level(-40),
                Signal::Level(-52),
            ],
            5,
        );
        assert_eq!(
            entries.iter().map(|e| e.level).collect::<Vec<_>>(),
            vec![-40, -50, -60, -70, -80]
        );
        assert_eq!(entries[0].color, Rgb::GREEN);
        assert_eq!(entries[2].color, Rgb::ORANGE);
        assert_eq!(entries[4].color, Rgb::RED);
        assert_eq!(entries[0].to_string(), "-40 dBm");
    }

    #[test]
    fn truncation() {
        // span of 7 over 4 steps
        let entries = legend([Signal::Level(-47), Signal::Level(-40)], 5);
        assert_eq!(
            entries.iter().map(|e| e.level).collect::<Vec<_>>(),
            vec![-40, -41, -43, -45, -47]
        );
    }

    #[test]
    fn extreme_levels() {
        let entries = legend([Signal::Level(i32::MIN), Signal::Level(1)], 5);
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].level, 1);
        assert_eq!(entries[4].level, i32::MIN);
        assert_eq!(entries[0].color, Rgb::GREEN);
        assert_eq!(entries[4].color, Rgb::RED);
        assert!(entries.windows(2).all(|w| w[0].level > w[1].level));

        let entries = legend([Signal::Level(i32::MIN), Signal::Level(i32::MAX)], 3);
        assert_eq!(entries[0].level, i32::MAX);
        assert_eq!(entries[2].level, i32::MIN);
    }
}
