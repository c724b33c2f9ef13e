pub mod error;
pub mod settings;
pub mod types;

pub use error::{Result, SyncError};
pub use settings::{DisplayMode, LayoutFlags, SettingsDiff, WidgetSettings, YearSetting};
pub use types::*;
