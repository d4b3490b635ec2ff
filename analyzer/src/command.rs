//! Line commands for a running session
//!
//! ```text
//! open <signal-id> [stake]
//! segment <all|classic|otc>
//! auto <on|off>
//! risk <percent>
//! balance <amount>
//! ```

use crate::session::Action;
use anyhow::{anyhow, bail, Context};
use common::SegmentFilter;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse one command line into an action.
pub fn parse_command(line: &str) -> anyhow::Result<Action> {
    let mut words = line.split_whitespace();
    let command = words.next().ok_or_else(|| anyhow!("empty command"))?;
    let args: Vec<&str> = words.collect();

    let action = match (command.to_lowercase().as_str(), args.as_slice()) {
        ("open", [signal_id]) => Action::OpenTrade {
            signal_id: signal_id.to_string(),
            stake: None,
        },
        ("open", [signal_id, stake]) => Action::OpenTrade {
            signal_id: signal_id.to_string(),
            stake: Some(parse_amount(stake)?),
        },
        ("segment", [filter]) => Action::SelectSegment {
            filter: SegmentFilter::from_str(filter).map_err(|e| anyhow!(e))?,
        },
        ("auto", [flag]) => Action::SetAutoUpdate {
            enabled: match *flag {
                "on" | "true" => true,
                "off" | "false" => false,
                other => bail!("expected on/off, got {}", other),
            },
        },
        ("risk", [percent]) => Action::SetRiskPercent {
            percent: percent
                .parse()
                .with_context(|| format!("invalid risk percent: {}", percent))?,
        },
        ("balance", [amount]) => Action::SetBalance {
            balance: parse_amount(amount)?,
        },
        (other, _) => bail!("unknown command or arguments: {}", other),
    };

    Ok(action)
}

fn parse_amount(text: &str) -> anyhow::Result<Decimal> {
    Decimal::from_str(text.trim_start_matches('$'))
        .with_context(|| format!("invalid amount: {}", text))
}
