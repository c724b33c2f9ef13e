use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Default refresh interval in minutes.
pub const DEFAULT_REFRESH_MINUTES: u32 = 30;

/// Default palette, level 0 (empty) to level 4 (busiest).
pub const DEFAULT_COLOR_LEVELS: [&str; 5] = ["#161b22", "#0e4429", "#006d32", "#26a641", "#39d353"];

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    #[default]
    Year,
    Month,
}

impl DisplayMode {
    pub fn toggled(self) -> Self {
        match self {
            DisplayMode::Year => DisplayMode::Month,
            DisplayMode::Month => DisplayMode::Year,
        }
    }
}

/// Which year to show: the wall-clock year or a fixed one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum YearSetting {
    #[default]
    Current,
    Fixed(i32),
}

impl YearSetting {
    pub fn resolve(self, current_year: i32) -> i32 {
        match self {
            YearSetting::Current => current_year,
            YearSetting::Fixed(y) => y,
        }
    }
}

impl Serialize for YearSetting {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            YearSetting::Current => serializer.serialize_str("current"),
            YearSetting::Fixed(y) => serializer.serialize_i32(*y),
        }
    }
}

impl<'de> Deserialize<'de> for YearSetting {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Number(n) => i32::try_from(n)
                .map(YearSetting::Fixed)
                .map_err(|_| serde::de::Error::custom(format!("year out of range: {n}"))),
            Raw::Text(s) => {
                let s = s.trim();
                if s.is_empty() || s.eq_ignore_ascii_case("current") {
                    Ok(YearSetting::Current)
                } else {
                    s.parse::<i32>()
                        .map(YearSetting::Fixed)
                        .map_err(|_| serde::de::Error::custom(format!("invalid year: {s:?}")))
                }
            }
        }
    }
}

/// Visibility flags consumed by the layout engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutFlags {
    pub show_header: bool,
    pub show_footer: bool,
    pub show_labels: bool,
    pub show_day_labels: bool,
}

impl Default for LayoutFlags {
    fn default() -> Self {
        Self {
            show_header: true,
            show_footer: true,
            show_labels: true,
            show_day_labels: true,
        }
    }
}

/// Full configuration snapshot for the widget.
///
/// Keys are camelCase on disk. Every field has a default, so a partial or
/// empty object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WidgetSettings {
    /// Minutes. `0` means "use the default".
    #[serde(alias = "refreshIntervalMinutes")]
    pub refresh_interval: u32,
    pub display_mode: DisplayMode,
    pub year: YearSetting,
    pub show_header: bool,
    pub show_footer: bool,
    pub show_labels: bool,
    pub show_day_labels: bool,
    pub show_stats: bool,
    pub color_level0: String,
    pub color_level1: String,
    pub color_level2: String,
    pub color_level3: String,
    pub color_level4: String,
    pub show_background: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    pub background_blur: f64,
    pub language: String,
}

impl Default for WidgetSettings {
    fn default() -> Self {
        Self {
            refresh_interval: DEFAULT_REFRESH_MINUTES,
            display_mode: DisplayMode::Year,
            year: YearSetting::Current,
            show_header: true,
            show_footer: true,
            show_labels: true,
            show_day_labels: true,
            show_stats: true,
            color_level0: DEFAULT_COLOR_LEVELS[0].to_string(),
            color_level1: DEFAULT_COLOR_LEVELS[1].to_string(),
            color_level2: DEFAULT_COLOR_LEVELS[2].to_string(),
            color_level3: DEFAULT_COLOR_LEVELS[3].to_string(),
            color_level4: DEFAULT_COLOR_LEVELS[4].to_string(),
            show_background: false,
            background_color: None,
            background_blur: 10.0,
            language: "en".to_string(),
        }
    }
}

/// Which parts of a replacement snapshot differ from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SettingsDiff {
    /// The effective target year moved; data must be refetched.
    pub year_changed: bool,
    /// Display mode or a visibility flag changed; the grid must be recomputed.
    pub structural: bool,
    pub refresh_interval: bool,
    /// Colors, background or stats visibility. Passed through as-is.
    pub cosmetic: bool,
}

impl SettingsDiff {
    pub fn is_empty(&self) -> bool {
        *self == SettingsDiff::default()
    }
}

impl WidgetSettings {
    pub fn refresh_minutes(&self) -> u32 {
        if self.refresh_interval == 0 {
            DEFAULT_REFRESH_MINUTES
        } else {
            self.refresh_interval
        }
    }

    pub fn refresh_window_ms(&self) -> i64 {
        i64::from(self.refresh_minutes()) * 60_000
    }

    pub fn target_year(&self, current_year: i32) -> i32 {
        self.year.resolve(current_year)
    }

    pub fn layout_flags(&self) -> LayoutFlags {
        LayoutFlags {
            show_header: self.show_header,
            show_footer: self.show_footer,
            show_labels: self.show_labels,
            show_day_labels: self.show_day_labels,
        }
    }

    /// Palette in level order. Empty entries fall back to the defaults.
    pub fn color_levels(&self) -> [&str; 5] {
        let raw = [
            self.color_level0.as_str(),
            self.color_level1.as_str(),
            self.color_level2.as_str(),
            self.color_level3.as_str(),
            self.color_level4.as_str(),
        ];
        let mut out = DEFAULT_COLOR_LEVELS;
        for (slot, value) in out.iter_mut().zip(raw) {
            if !value.trim().is_empty() {
                *slot = value;
            }
        }
        out
    }

    /// Compare against a replacement snapshot. Only fields the controller
    /// reacts to are classified individually.
    pub fn diff(&self, next: &WidgetSettings, current_year: i32) -> SettingsDiff {
        let structural = self.display_mode != next.display_mode
            || self.layout_flags() != next.layout_flags();
        let cosmetic = self.color_levels() != next.color_levels()
            || self.show_background != next.show_background
            || self.background_color != next.background_color
            || self.background_blur != next.background_blur
            || self.show_stats != next.show_stats
            || self.language != next.language;
        SettingsDiff {
            year_changed: self.target_year(current_year) != next.target_year(current_year),
            structural,
            refresh_interval: self.refresh_minutes() != next.refresh_minutes(),
            cosmetic,
        }
    }
}
