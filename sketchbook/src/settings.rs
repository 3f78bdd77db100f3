use sketchbook_core::{color::Color, stroke::Brush};

const DOCUMENTATION: &str = r##"# Sketchbook settings. You may edit this file, but be aware that formatting and comments will not
# be preserved. Missing fields take their default value.

# pen_color: initial pen color, "#RRGGBB" or "#RRGGBBAA".
# tool_size: initial pen thickness, eraser radius and cursor size, 1 to 50.
# viewport: [width, height] of the drawing area scripts start with.
# snapshot_extension: image format used by `save` when the path has no extension.

"##;

#[must_use]
pub fn preferences_dir() -> Option<std::path::PathBuf> {
    let mut base_dir = dirs::preference_dir()?;
    base_dir.push(env!("CARGO_PKG_NAME"));
    Some(base_dir)
}

/// A [`Color`] stored as a hex string.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default)]
pub struct HexColor(pub Color);
impl serde::Serialize for HexColor {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0.to_hex())
    }
}
impl<'de> serde::Deserialize<'de> for HexColor {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        // Borrowed or owned, depending on what the deserializer can give.
        let str =
            <std::borrow::Cow<'de, str> as serde::Deserialize<'de>>::deserialize(deserializer)?;
        str.parse().map(Self).map_err(serde::de::Error::custom)
    }
}

#[derive(serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq, Debug)]
#[serde(default)]
pub struct Settings {
    pub pen_color: HexColor,
    pub tool_size: u32,
    pub viewport: [u32; 2],
    pub snapshot_extension: String,
}
impl Default for Settings {
    fn default() -> Self {
        Self {
            pen_color: HexColor(Color::BLACK),
            tool_size: Brush::DEFAULT_SIZE,
            viewport: [1024, 720],
            snapshot_extension: "jpg".to_owned(),
        }
    }
}
impl Settings {
    const FILENAME: &'static str = "settings.toml";
    /// Load from user preferences, or default if unavailable for some reason.
    #[must_use]
    pub fn load() -> Self {
        let Some(mut path) = preferences_dir() else {
            log::warn!("No preferences dir found, using default settings.");
            return Self::default();
        };
        path.push(Self::FILENAME);
        Self::load_or_default(&path)
    }
    #[must_use]
    fn load_or_default(path: &std::path::Path) -> Self {
        let settings: anyhow::Result<Self> = try_block::try_block! {
            let string = std::fs::read_to_string(path)?;
            Ok(Self::parse(&string)?)
        };
        match settings {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Settings at {path:?} weren't available, defaulting: {e:#}");
                Self::default()
            }
        }
    }
    /// Parse from TOML text, clamping out-of-range values.
    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        let mut settings: Self = toml::from_str(text)?;
        settings.tool_size = settings
            .tool_size
            .clamp(Brush::MIN_SIZE, Brush::MAX_SIZE);
        Ok(settings)
    }
    /// Pretty TOML with the documentation header.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        let string = toml::ser::to_string_pretty(self)?;
        Ok(DOCUMENTATION.to_owned() + &string)
    }
    pub fn save(&self) -> anyhow::Result<()> {
        let mut preferences =
            preferences_dir().ok_or_else(|| anyhow::anyhow!("No preferences dir found"))?;
        // Explicity do *not* create recursively. If not found, the user probably has a good reason.
        // Ignore errors (could already exist). Any real errors will be emitted by file access below.
        let _ = std::fs::DirBuilder::new().create(&preferences);

        preferences.push(Self::FILENAME);
        std::fs::write(preferences, self.to_toml()?)?;
        Ok(())
    }
    #[must_use]
    pub fn brush(&self) -> Brush {
        Brush {
            color: self.pen_color.0,
            size: Brush::DEFAULT_SIZE,
        }
        .with_size(self.tool_size)
    }
    #[must_use]
    pub fn viewport(&self) -> (u32, u32) {
        (self.viewport[0], self.viewport[1])
    }
}
