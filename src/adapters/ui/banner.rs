//! Startup banner: service name, mode and collaborator status in neon colors.

use crate::adapters::http::ServiceStatus;
use crossterm::ExecutableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use std::io::{Write, stdout};

/// Neon Purple (#bc13fe).
const NEON_PURPLE: (u8, u8, u8) = (0xbc, 0x13, 0xfe);
/// Cyber Green (#0ff0fc).
const CYBER_GREEN: (u8, u8, u8) = (0x0f, 0xf0, 0xfc);

const RULE_WIDTH: usize = 60;

/// Linear interpolation between two RGB colors. `t` in [0.0, 1.0].
fn lerp_rgb(a: (u8, u8, u8), b: (u8, u8, u8), t: f64) -> (u8, u8, u8) {
    let r = (f64::from(a.0) * (1.0 - t) + f64::from(b.0) * t).round() as u8;
    let g = (f64::from(a.1) * (1.0 - t) + f64::from(b.1) * t).round() as u8;
    let bl = (f64::from(a.2) * (1.0 - t) + f64::from(b.2) * t).round() as u8;
    (r, g, bl)
}

/// Banner text, one entry per line.
pub fn banner_lines(status: &ServiceStatus, bind_addr: &str) -> Vec<String> {
    let rule = "=".repeat(RULE_WIDTH);
    vec![
        rule.clone(),
        format!("Inbox Triage v{}", env!("CARGO_PKG_VERSION")),
        rule.clone(),
        format!("Mock Mode: {}", status.mock_mode),
        format!("OpenAI Configured: {}", status.openai_configured),
        format!("Google Sheets Configured: {}", status.sheets_configured),
        rule.clone(),
        format!("Starting server on http://{}", bind_addr),
        rule,
    ]
}

/// Prints the banner with a gradient from Neon Purple to Cyber Green.
pub fn print_startup(status: &ServiceStatus, bind_addr: &str) {
    let mut out = stdout();
    let lines = banner_lines(status, bind_addr);
    let total = lines.len().max(1);

    for (i, line) in lines.iter().enumerate() {
        let t = if total <= 1 {
            1.0
        } else {
            i as f64 / (total - 1) as f64
        };
        let (r, g, b) = lerp_rgb(NEON_PURPLE, CYBER_GREEN, t);
        let _ = out.execute(SetForegroundColor(Color::Rgb { r, g, b }));
        let _ = out.execute(Print(line));
        let _ = out.execute(Print("\n"));
        let _ = out.execute(ResetColor);
    }
    let _ = out.flush();
}
