//! Plain-text rendering of a view snapshot.

use std::fmt::Write;

use crate::domain::{Crossing, Indicator};

use super::state::{Phase, ViewSnapshot};

/// Render the ranked crossing list, one crossing per line.
pub fn render_list(snapshot: &ViewSnapshot) -> String {
    let mut out = String::new();

    match snapshot.phase {
        Phase::Uninitialized => {}
        Phase::Loading => out.push_str("Loading crossings...\n"),
        Phase::Error => {
            let reason = snapshot.error.as_deref().unwrap_or("unknown error");
            let _ = writeln!(out, "Error loading crossings: {reason}");
        }
        Phase::Ready => {
            let _ = writeln!(
                out,
                "Crossings nearest {} ({})",
                snapshot.point, snapshot.zoom
            );
            if snapshot.crossings.is_empty() {
                out.push_str("  (none)\n");
            }
            for (rank, crossing) in snapshot.crossings.iter().enumerate() {
                let _ = writeln!(out, "{:>3}. {}", rank + 1, render_crossing(crossing));
            }
        }
    }

    out
}

/// One crossing: title, indicator, and timing.
///
/// Duration is only shown while blocked; unknown crossings get no times.
pub fn render_crossing(crossing: &Crossing) -> String {
    let indicator = crossing.indicator();
    let detail = match (indicator, crossing.observation()) {
        (Indicator::Blocked, Some(obs)) => format!("since {}, for {}", obs.start, obs.duration),
        (_, Some(obs)) => format!("since {}", obs.start),
        (_, None) => "status unavailable".to_string(),
    };

    format!("{:<32} {:<8} {}", crossing.title, indicator, detail)
}
