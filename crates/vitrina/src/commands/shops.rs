//! Shop command handlers.

use std::sync::Arc;

use tabled::Tabled;
use vitrina_core::{Marketplace, Shop, StreamFilter, selectors};

use crate::cli::{GlobalOpts, ShopsArgs, ShopsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ShopRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Plan")]
    plan: String,
    #[tabled(rename = "Rating")]
    rating: String,
    #[tabled(rename = "City")]
    city: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Arc<Shop>> for ShopRow {
    fn from(s: &Arc<Shop>) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            plan: s.plan.to_string(),
            rating: format!("{:.1} ({})", s.rating.average, s.rating.count),
            city: s.city.clone().unwrap_or_default(),
            status: s.status.map_or_else(|| "-".into(), |st| st.to_string()),
        }
    }
}

fn detail(s: &Arc<Shop>) -> String {
    let mut lines = vec![
        format!("ID:        {}", s.id),
        format!("Name:      {}", s.name),
        format!("Plan:      {}", s.plan),
        format!(
            "Status:    {}",
            s.status.map_or_else(|| "-".into(), |st| st.to_string())
        ),
        format!("Rating:    {:.1} ({} votes)", s.rating.average, s.rating.count),
        format!("Address:   {}", s.address.as_deref().unwrap_or("-")),
        format!(
            "Streams:   {} of {} used",
            s.stream_quota.used,
            s.stream_quota.total()
        ),
    ];
    if let Some(ref ig) = s.contact.instagram {
        lines.push(format!("Instagram: {ig}"));
    }
    if let Some(ref wa) = s.contact.whatsapp {
        lines.push(format!("WhatsApp:  {wa}"));
    }
    if let Some(ref web) = s.contact.website {
        lines.push(format!("Website:   {web}"));
    }
    let penalties = s.active_penalties().count();
    if penalties > 0 {
        lines.push(format!("Penalties: {penalties} active"));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(
    marketplace: &Marketplace,
    args: ShopsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        ShopsCommand::List { all, query } => {
            let ranked = if all {
                selectors::rank_shops(&marketplace.shops_snapshot())
            } else {
                marketplace.public_shops()
            };
            let shops = match query {
                Some(ref q) => selectors::search_shops(&ranked, q),
                None => ranked,
            };
            let out = output::render_list(
                &global.output,
                &shops,
                |s| ShopRow::from(s),
                |s| s.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ShopsCommand::Get { shop } => {
            let found = marketplace.shop(&shop).ok_or_else(|| CliError::NotFound {
                resource_type: "shop".into(),
                identifier: shop.clone(),
                list_command: "shops list".into(),
            })?;
            let out = output::render_single(&global.output, &found, detail, |s| s.id.clone());
            output::print_output(&out, global.quiet);

            if matches!(global.output, crate::cli::OutputFormat::Table) {
                let streams = marketplace.streams_of_shop(&shop, StreamFilter::All);
                if !streams.is_empty() {
                    let mut lines = vec![String::new(), "Streams:".to_owned()];
                    lines.extend(streams.iter().map(|st| {
                        format!("  {}  {}  {}", util::fmt_local(st.scheduled_at), st.status, st.title)
                    }));
                    output::print_output(&lines.join("\n"), global.quiet);
                }
            }
            Ok(())
        }
    }
}
