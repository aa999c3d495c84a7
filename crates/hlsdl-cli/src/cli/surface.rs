//! Terminal progress surface: forwards stats to the printer task, answers
//! cancel once Ctrl-C was pressed, and picks a variant from flags or stdin.

use std::io::{BufRead, Write};

use hlsdl_core::control::CancelToken;
use hlsdl_core::manifest::VariantSet;
use hlsdl_core::scheduler::ProgressStats;
use hlsdl_core::session::{ProgressSurface, SessionState};
use tokio::sync::mpsc;

use crate::cli::HlsOptions;

/// How a master-playlist variant is picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantChoice {
    Index(usize),
    Best,
    /// Prompt on stdin.
    Ask,
}

impl From<&HlsOptions> for VariantChoice {
    fn from(opts: &HlsOptions) -> Self {
        match (opts.variant, opts.best) {
            (Some(i), _) => VariantChoice::Index(i),
            (None, true) => VariantChoice::Best,
            (None, false) => VariantChoice::Ask,
        }
    }
}

pub struct TerminalSurface {
    progress: mpsc::Sender<ProgressStats>,
    cancel: CancelToken,
    choice: VariantChoice,
}

impl TerminalSurface {
    pub fn new(progress: mpsc::Sender<ProgressStats>, cancel: CancelToken, choice: VariantChoice) -> Self {
        Self {
            progress,
            cancel,
            choice,
        }
    }
}

impl ProgressSurface for TerminalSurface {
    fn on_progress(&mut self, stats: &ProgressStats) -> bool {
        // The printer only needs a recent snapshot; drop when it lags.
        let _ = self.progress.try_send(stats.clone());
        !self.cancel.is_cancelled()
    }

    fn choose_variant(&mut self, variants: &VariantSet) -> Option<String> {
        if self.cancel.is_cancelled() {
            return None;
        }
        match self.choice {
            VariantChoice::Index(i) => match variants.nth(i) {
                Some(v) => Some(v.url.clone()),
                None => {
                    eprintln!("variant {} not found ({} available)", i, variants.len());
                    None
                }
            },
            VariantChoice::Best => variants
                .highest_bandwidth()
                .or_else(|| variants.nth(0))
                .map(|v| v.url.clone()),
            VariantChoice::Ask => {
                let stdin = std::io::stdin();
                let stderr = std::io::stderr();
                prompt_variant(variants, &mut stdin.lock(), &mut stderr.lock())
            }
        }
    }

    fn on_state(&mut self, state: SessionState) {
        tracing::debug!(state = %state, "session state changed");
        if state == SessionState::Finalizing && self.cancel.is_cancelled() {
            eprintln!("cancelled; discarding partial download");
        }
    }
}

/// Lists the variants on `out` and reads an index from `input`.
/// An empty line or end of input dismisses.
pub fn prompt_variant(variants: &VariantSet, input: &mut dyn BufRead, out: &mut dyn Write) -> Option<String> {
    let _ = writeln!(out, "Variants:");
    for (i, v) in variants.iter().enumerate() {
        let _ = writeln!(out, "  [{}] {}", i, v.attributes);
        let _ = writeln!(out, "      {}", v.url);
    }
    loop {
        let _ = write!(out, "Choose a variant (empty to cancel): ");
        let _ = out.flush();
        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) | Err(_) => return None,
            Ok(_) => {}
        }
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        match line.parse::<usize>().ok().and_then(|i| variants.nth(i)) {
            Some(v) => return Some(v.url.clone()),
            None => {
                let _ = writeln!(out, "enter a number from 0 to {}", variants.len().saturating_sub(1));
            }
        }
    }
}
