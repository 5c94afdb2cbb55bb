//! Anti-detection session configuration.
//!
//! The code generator applies one `StealthProfile` to every `open` statement,
//! whatever the browser kind; the profile is plain data and can be overridden
//! from a JSON file at build time.

use serde::{Deserialize, Serialize};

/// Session-level settings that make an automated browser session present as
/// an ordinary user session to the pages it visits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StealthProfile {
    /// Command-line arguments passed to the browser options object.
    pub arguments: Vec<String>,
    /// Chromium switches removed via the `excludeSwitches` experimental option.
    pub excluded_switches: Vec<String>,
    /// Value of the `useAutomationExtension` experimental option.
    pub use_automation_extension: bool,
    /// Client-identifier string the session reports to pages.
    pub user_agent: String,
    /// Session viewport width in pixels.
    pub window_width: u32,
    /// Session viewport height in pixels.
    pub window_height: u32,
    /// Script executed right after the session is created; strips the
    /// automation flag the page's scripting object exposes.
    pub init_script: String,
    /// Settle delay emitted after the driver is constructed, in seconds.
    pub settle_seconds: f64,
}

impl Default for StealthProfile {
    fn default() -> Self {
        Self {
            arguments: vec![
                "--disable-blink-features=AutomationControlled".to_string(),
                "--disable-dev-shm-usage".to_string(),
                "--no-sandbox".to_string(),
                "--disable-gpu".to_string(),
            ],
            excluded_switches: vec!["enable-automation".to_string()],
            use_automation_extension: false,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            window_width: 1920,
            window_height: 1080,
            init_script: "Object.defineProperty(navigator, 'webdriver', {get: () => undefined})"
                .to_string(),
            settle_seconds: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_masks_automation() {
        let profile = StealthProfile::default();
        assert!(profile
            .arguments
            .iter()
            .any(|a| a.contains("AutomationControlled")));
        assert!(profile
            .excluded_switches
            .contains(&"enable-automation".to_string()));
        assert!(profile.init_script.contains("navigator"));
        assert!(!profile.use_automation_extension);
    }

    #[test]
    fn test_profile_loads_from_json() {
        let json = r#"{
            "arguments": ["--headless=new"],
            "excluded_switches": [],
            "use_automation_extension": false,
            "user_agent": "TestAgent/1.0",
            "window_width": 1280,
            "window_height": 720,
            "init_script": "",
            "settle_seconds": 0.0
        }"#;
        let profile: StealthProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.window_width, 1280);
        assert_eq!(profile.user_agent, "TestAgent/1.0");
        assert!(profile.excluded_switches.is_empty());
    }
}
