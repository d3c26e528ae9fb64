//! Rule command handlers.

use tabled::Tabled;

use netseg_core::{Analyzer, FirewallId, MemoryStore, Rule, RuleFilter, RuleId};

use crate::cli::{GlobalOpts, RulesArgs, RulesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct RuleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Src")]
    source: String,
    #[tabled(rename = "Dst")]
    destination: String,
    #[tabled(rename = "Protocol")]
    protocol: String,
    #[tabled(rename = "Ports")]
    ports: String,
    #[tabled(rename = "Action")]
    action: String,
}

impl From<&Rule> for RuleRow {
    fn from(r: &Rule) -> Self {
        Self {
            id: r.id.to_string(),
            name: r.rule_name.clone(),
            source: r.source_segment_id.to_string(),
            destination: r.destination_segment_id.to_string(),
            protocol: r.protocol.to_string(),
            ports: util::or_dash(r.port_expr()),
            action: r.action.to_string(),
        }
    }
}

fn rule_detail(r: &Rule) -> String {
    [
        format!("ID:          {}", r.id),
        format!("Name:        {}", r.rule_name),
        format!("Firewall:    {}", r.firewall_id),
        format!("Source:      segment {}", r.source_segment_id),
        format!("Destination: segment {}", r.destination_segment_id),
        format!("Protocol:    {}", r.protocol),
        format!("Ports:       {}", util::or_dash(r.port_expr())),
        format!("Action:      {}", r.action),
        format!("Description: {}", util::or_dash(r.description.as_deref())),
    ]
    .join("\n")
}

pub async fn handle(
    analyzer: &Analyzer<MemoryStore>,
    args: RulesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let out = match args.command {
        RulesCommand::List {
            protocol,
            action,
            firewall,
        } => {
            let filter = RuleFilter {
                protocols: util::map_protocols(&protocol),
                action: action.map(util::map_action),
                firewall_id: firewall.map(FirewallId),
            };
            let rules = analyzer.rules(&filter).await?;
            output::render_list(global.output_format(), &rules, |r| RuleRow::from(r), |r| {
                r.id.to_string()
            })?
        }
        RulesCommand::Get { id } => {
            let rule = analyzer.rule(RuleId(id)).await?;
            output::render_single(global.output_format(), &rule, rule_detail, |r| {
                r.id.to_string()
            })?
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
