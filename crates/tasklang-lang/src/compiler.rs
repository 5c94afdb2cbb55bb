//! TaskLang code generator — validated AST → Python Selenium script.
//!
//! Generation is purely syntax-directed: a fixed preamble, then one emission
//! block per statement in source order. It is total over a validated program;
//! operand problems are the checker's to reject.

use tasklang_core::StealthProfile;

use crate::ast::{Program, Selector, SelectorKind, Statement};

/// Fixed table mapping selector kinds to driver locator strategies.
fn locator(kind: SelectorKind) -> &'static str {
    match kind {
        SelectorKind::Id => "By.ID",
        SelectorKind::Name => "By.NAME",
        SelectorKind::Css => "By.CSS_SELECTOR",
        SelectorKind::Xpath => "By.XPATH",
        SelectorKind::Tag => "By.TAG_NAME",
    }
}

/// Per-browser driver construction names: (options class, webdriver class).
fn driver_classes(browser: &str) -> (&'static str, &'static str) {
    match browser.to_ascii_lowercase().as_str() {
        "chrome" => ("ChromeOptions", "Chrome"),
        "firefox" => ("FirefoxOptions", "Firefox"),
        "edge" => ("EdgeOptions", "Edge"),
        "safari" => ("SafariOptions", "Safari"),
        other => {
            // Only reachable if an unvalidated program bypassed the checker.
            tracing::warn!("unvalidated browser '{}' reached code generation", other);
            ("ChromeOptions", "Chrome")
        }
    }
}

/// Renders a string as a double-quoted Python literal.
fn py_str(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Integral durations print without a trailing `.0`, fractional ones as-is.
fn py_seconds(seconds: f64) -> String {
    if seconds.fract() == 0.0 {
        format!("{}", seconds as i64)
    } else {
        format!("{}", seconds)
    }
}

/// A `css` selector value may carry comma-separated fallback alternatives;
/// other kinds always locate exactly one way.
fn fallback_alternatives(selector: &Selector) -> Vec<String> {
    if selector.kind == SelectorKind::Css && selector.value.contains(',') {
        selector
            .value
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    } else {
        vec![selector.value.clone()]
    }
}

/// Generates the Python automation script for a validated TaskLang program.
pub struct Compiler {
    profile: StealthProfile,
    lines: Vec<String>,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(StealthProfile::default())
    }
}

impl Compiler {
    pub fn new(profile: StealthProfile) -> Self {
        Self {
            profile,
            lines: Vec::new(),
        }
    }

    /// Emit the full script: preamble first, then one block per statement in
    /// source order. Total: a validated program cannot fail to generate.
    pub fn generate(mut self, program: &Program) -> String {
        self.emit_preamble();
        for statement in &program.statements {
            self.emit_statement(statement);
        }
        let mut script = self.lines.join("\n");
        script.push('\n');
        script
    }

    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Driver imports plus the anti-detection session configuration, applied
    /// to every `open` via `stealth_options`.
    fn emit_preamble(&mut self) {
        let profile = self.profile.clone();

        self.push("from selenium import webdriver");
        self.push("from selenium.webdriver.chrome.options import Options as ChromeOptions");
        self.push("from selenium.webdriver.firefox.options import Options as FirefoxOptions");
        self.push("from selenium.webdriver.edge.options import Options as EdgeOptions");
        self.push("from selenium.webdriver.safari.options import Options as SafariOptions");
        self.push("from selenium.webdriver.common.by import By");
        self.push("from selenium.webdriver.common.keys import Keys");
        self.push("from selenium.common.exceptions import NoSuchElementException");
        self.push("import time");
        self.push("");
        self.push("");
        self.push("def stealth_options(options):");
        for argument in &profile.arguments {
            self.push(format!("    options.add_argument({})", py_str(argument)));
        }
        self.push(format!(
            "    options.add_argument({})",
            py_str(&format!(
                "--window-size={},{}",
                profile.window_width, profile.window_height
            ))
        ));
        self.push(format!(
            "    options.add_argument({})",
            py_str(&format!("user-agent={}", profile.user_agent))
        ));
        let switches = profile
            .excluded_switches
            .iter()
            .map(|s| py_str(s))
            .collect::<Vec<_>>()
            .join(", ");
        self.push(format!(
            "    options.add_experimental_option(\"excludeSwitches\", [{}])",
            switches
        ));
        self.push(format!(
            "    options.add_experimental_option(\"useAutomationExtension\", {})",
            if profile.use_automation_extension {
                "True"
            } else {
                "False"
            }
        ));
        self.push("    return options");
        self.push("");
    }

    fn emit_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Open { browser, .. } => self.emit_open(browser),
            Statement::Go { url, .. } => {
                self.push(format!("driver.get({})", py_str(url)));
            }
            Statement::Type { text, target, .. } => {
                let payload = py_str(text);
                self.emit_send_keys(target, &payload);
            }
            Statement::Click { target, .. } => self.emit_click(target),
            Statement::Enter { target, .. } => self.emit_send_keys(target, "Keys.ENTER"),
            Statement::Wait { seconds, .. } => {
                self.push(format!("time.sleep({})", py_seconds(*seconds)));
            }
            Statement::Screenshot { filename, .. } => {
                self.push(format!("driver.save_screenshot({})", py_str(filename)));
            }
            Statement::Close { .. } => self.push("driver.quit()"),
        }
    }

    /// Construct the driver session with the stealth profile, strip the
    /// automation flag the page can probe, then let the browser settle.
    fn emit_open(&mut self, browser: &str) {
        let (options_class, driver_class) = driver_classes(browser);
        self.push(format!("options = stealth_options({}())", options_class));
        self.push(format!(
            "driver = webdriver.{}(options=options)",
            driver_class
        ));
        if !self.profile.init_script.is_empty() {
            let script = py_str(&self.profile.init_script);
            self.push(format!("driver.execute_script({})", script));
        }
        if self.profile.settle_seconds > 0.0 {
            self.push(format!(
                "time.sleep({})",
                py_seconds(self.profile.settle_seconds)
            ));
        }
    }

    fn emit_send_keys(&mut self, target: &Option<Selector>, payload: &str) {
        match target {
            Some(selector) => self.push(format!(
                "driver.find_element({}, {}).send_keys({})",
                locator(selector.kind),
                py_str(&selector.value),
                payload
            )),
            None => self.push(format!(
                "driver.switch_to.active_element.send_keys({})",
                payload
            )),
        }
    }

    /// A multi-alternative `css` selector becomes an ordered probe chain:
    /// the first alternative that resolves is clicked and the rest are never
    /// tried; if none resolves, the failure names every alternative.
    fn emit_click(&mut self, target: &Option<Selector>) {
        let selector = match target {
            Some(selector) => selector,
            None => {
                self.push("driver.switch_to.active_element.click()");
                return;
            }
        };

        let alternatives = fallback_alternatives(selector);
        if alternatives.len() > 1 {
            let candidates = alternatives
                .iter()
                .map(|s| py_str(s))
                .collect::<Vec<_>>()
                .join(", ");
            let exhausted = py_str(&format!(
                "no element matched any of: {}",
                alternatives.join(", ")
            ));
            self.push(format!("for candidate in [{}]:", candidates));
            self.push("    try:");
            self.push("        driver.find_element(By.CSS_SELECTOR, candidate).click()");
            self.push("        break");
            self.push("    except NoSuchElementException:");
            self.push("        continue");
            self.push("else:");
            self.push(format!("    raise NoSuchElementException({})", exhausted));
        } else {
            self.push(format!(
                "driver.find_element({}, {}).click()",
                locator(selector.kind),
                py_str(&alternatives[0])
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;
    use crate::parser::Parser;

    fn generate(src: &str) -> String {
        let tokens = Lexer::new(src, "test.task").tokenize().unwrap();
        let program = Parser::new(tokens, "test.task").parse().unwrap();
        Compiler::default().generate(&program)
    }

    fn line_index(script: &str, needle: &str) -> usize {
        script
            .lines()
            .position(|l| l.contains(needle))
            .unwrap_or_else(|| panic!("line containing {:?} not found in:\n{}", needle, script))
    }

    #[test]
    fn test_preamble_precedes_statements() {
        let script = generate("open chrome\ngo https://example.com/\n");
        assert!(line_index(&script, "AutomationControlled") < line_index(&script, "webdriver.Chrome("));
        assert!(line_index(&script, "excludeSwitches") < line_index(&script, "webdriver.Chrome("));
        assert!(line_index(&script, "from selenium import webdriver") == 0);
    }

    #[test]
    fn test_open_emits_stealth_session() {
        let script = generate("open chrome");
        assert!(script.contains("options = stealth_options(ChromeOptions())"));
        assert!(script.contains("driver = webdriver.Chrome(options=options)"));
        assert!(script.contains(
            "driver.execute_script(\"Object.defineProperty(navigator, 'webdriver', {get: () => undefined})\")"
        ));
        assert!(script.contains("time.sleep(2)"));
        assert!(script.contains("user-agent=Mozilla/5.0"));
        assert!(script.contains("--window-size=1920,1080"));
    }

    #[test]
    fn test_every_browser_maps_to_its_driver() {
        for (name, options_class, driver_class) in [
            ("chrome", "ChromeOptions", "Chrome"),
            ("firefox", "FirefoxOptions", "Firefox"),
            ("edge", "EdgeOptions", "Edge"),
            ("safari", "SafariOptions", "Safari"),
        ] {
            let script = generate(&format!("open {}", name));
            assert!(script.contains(&format!("stealth_options({}())", options_class)));
            assert!(script.contains(&format!("webdriver.{}(options=options)", driver_class)));
        }
    }

    #[test]
    fn test_unvalidated_browser_falls_back_to_chrome() {
        // Contract breach path: the checker would normally reject this.
        let script = generate("open netscape");
        assert!(script.contains("webdriver.Chrome(options=options)"));
    }

    #[test]
    fn test_statement_blocks_in_source_order() {
        let script = generate(
            "open chrome\ngo https://example.com/\nwait 3\nscreenshot out.png\nclose\n",
        );
        let open = line_index(&script, "webdriver.Chrome(options=options)");
        let go = line_index(&script, "driver.get(\"https://example.com/\")");
        let wait = line_index(&script, "time.sleep(3)");
        let shot = line_index(&script, "driver.save_screenshot(\"out.png\")");
        let close = line_index(&script, "driver.quit()");
        assert!(open < go && go < wait && wait < shot && shot < close);
    }

    #[test]
    fn test_type_with_selector() {
        let script = generate("type \"rust compiler\" in name \"q\"");
        assert!(script.contains("driver.find_element(By.NAME, \"q\").send_keys(\"rust compiler\")"));
    }

    #[test]
    fn test_type_without_selector_uses_focused_element() {
        let script = generate("type \"hello\"");
        assert!(script.contains("driver.switch_to.active_element.send_keys(\"hello\")"));
    }

    #[test]
    fn test_enter_with_and_without_selector() {
        let script = generate("enter in id \"search\"");
        assert!(script.contains("driver.find_element(By.ID, \"search\").send_keys(Keys.ENTER)"));
        let script = generate("enter");
        assert!(script.contains("driver.switch_to.active_element.send_keys(Keys.ENTER)"));
    }

    #[test]
    fn test_click_locator_table() {
        let cases = [
            ("click id \"submit\"", "By.ID, \"submit\""),
            ("click name \"q\"", "By.NAME, \"q\""),
            ("click css \".btn\"", "By.CSS_SELECTOR, \".btn\""),
            ("click xpath \"//a[1]\"", "By.XPATH, \"//a[1]\""),
            ("click tag \"button\"", "By.TAG_NAME, \"button\""),
        ];
        for (src, expected) in cases {
            let script = generate(src);
            assert!(
                script.contains(&format!("driver.find_element({}).click()", expected)),
                "missing {:?} for {:?}",
                expected,
                src
            );
        }
    }

    #[test]
    fn test_click_without_selector_uses_focused_element() {
        let script = generate("click");
        assert!(script.contains("driver.switch_to.active_element.click()"));
    }

    #[test]
    fn test_css_fallback_chain() {
        let script = generate("click css \"a.x, a.y, a.z\"");
        assert!(script.contains("for candidate in [\"a.x\", \"a.y\", \"a.z\"]:"));
        assert!(script.contains("driver.find_element(By.CSS_SELECTOR, candidate).click()"));
        assert!(script.contains("except NoSuchElementException:"));
        assert!(script
            .contains("raise NoSuchElementException(\"no element matched any of: a.x, a.y, a.z\")"));
        // Probe order follows the source order of the alternatives.
        assert!(line_index(&script, "for candidate") < line_index(&script, "raise NoSuchElement"));
    }

    #[test]
    fn test_single_css_selector_clicks_directly() {
        let script = generate("click css \"a.only\"");
        assert!(script.contains("driver.find_element(By.CSS_SELECTOR, \"a.only\").click()"));
        assert!(!script.contains("for candidate"));
    }

    #[test]
    fn test_comma_in_xpath_does_not_split() {
        let script = generate("click xpath \"//a[contains(@class, 'x')]\"");
        assert!(script.contains("By.XPATH"));
        assert!(!script.contains("for candidate"));
    }

    #[test]
    fn test_wait_preserves_fractions() {
        let script = generate("wait 1.5");
        assert!(script.contains("time.sleep(1.5)"));
        let script = generate("wait 3");
        assert!(script.contains("time.sleep(3)"));
        assert!(!script.contains("time.sleep(3.0)"));
    }

    #[test]
    fn test_quotes_in_text_are_escaped() {
        let program = Program {
            statements: vec![Statement::Type {
                text: "say \"hi\"".to_string(),
                target: None,
                span: crate::lexer::Span::new(1, 1),
            }],
        };
        let script = Compiler::default().generate(&program);
        assert!(script.contains("send_keys(\"say \\\"hi\\\"\")"));
    }

    #[test]
    fn test_script_without_close_still_generates() {
        let script = generate("open chrome\ngo https://example.com/\n");
        assert!(script.contains("driver.get("));
        assert!(!script.contains("driver.quit()"));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let src = "open chrome\nclick css \"a.x, a.y\"\nwait 0.5\nclose\n";
        assert_eq!(generate(src), generate(src));
    }
}
