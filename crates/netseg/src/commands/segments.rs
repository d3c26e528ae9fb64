//! Segment command handlers.

use tabled::Tabled;

use netseg_core::{Analyzer, MemoryStore, Segment, SegmentFilter, SegmentId};

use crate::cli::{GlobalOpts, SegmentsArgs, SegmentsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct SegmentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "IP Range")]
    ip_range: String,
    #[tabled(rename = "Zone")]
    zone_type: String,
}

impl From<&Segment> for SegmentRow {
    fn from(s: &Segment) -> Self {
        Self {
            id: s.id.to_string(),
            name: s.name.clone(),
            ip_range: s.ip_range.clone(),
            zone_type: s.zone_type.clone(),
        }
    }
}

fn segment_detail(s: &Segment) -> String {
    [
        format!("ID:          {}", s.id),
        format!("Name:        {}", s.name),
        format!("IP Range:    {}", s.ip_range),
        format!("Zone:        {}", s.zone_type),
        format!("Color:       {}", s.color),
        format!("Description: {}", util::or_dash(s.description.as_deref())),
    ]
    .join("\n")
}

pub async fn handle(
    analyzer: &Analyzer<MemoryStore>,
    args: SegmentsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let out = match args.command {
        SegmentsCommand::List { zone } => {
            let segments = analyzer.segments(&SegmentFilter::zones(zone)).await?;
            output::render_list(
                global.output_format(),
                &segments,
                |s| SegmentRow::from(s),
                |s| s.id.to_string(),
            )?
        }
        SegmentsCommand::Get { id } => {
            let segment = analyzer.segment(SegmentId(id)).await?;
            output::render_single(global.output_format(), &segment, segment_detail, |s| {
                s.id.to_string()
            })?
        }
    };
    output::print_output(&out, global.quiet);
    Ok(())
}
