//! Stream command handlers.

use std::sync::Arc;

use tabled::Tabled;
use vitrina_core::{Marketplace, Notice, Stream, StreamFilter};

use crate::cli::{GlobalOpts, StreamFilterArg, StreamsArgs, StreamsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

impl From<StreamFilterArg> for StreamFilter {
    fn from(f: StreamFilterArg) -> Self {
        match f {
            StreamFilterArg::Todos => Self::All,
            StreamFilterArg::EnVivo => Self::Live,
            StreamFilterArg::Proximos => Self::Upcoming,
            StreamFilterArg::Finalizados => Self::Finished,
        }
    }
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct StreamRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "When")]
    when: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Shop")]
    shop: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Platform")]
    platform: String,
    #[tabled(rename = "Views")]
    views: u64,
}

impl From<&Arc<Stream>> for StreamRow {
    fn from(s: &Arc<Stream>) -> Self {
        Self {
            id: s.id.clone(),
            when: util::fmt_local(s.scheduled_at),
            status: s.status.to_string(),
            shop: s.shop.name.clone(),
            title: s.title.clone(),
            platform: s.platform.clone().unwrap_or_default(),
            views: s.views,
        }
    }
}

fn detail(s: &Arc<Stream>) -> String {
    let mut lines = vec![
        format!("ID:         {}", s.id),
        format!("Title:      {}", s.title),
        format!("Shop:       {} ({})", s.shop.name, s.shop.id),
        format!("Status:     {}", s.status),
        format!("Scheduled:  {}", util::fmt_local(s.scheduled_at)),
        format!("Platform:   {}", s.platform.as_deref().unwrap_or("-")),
        format!("URL:        {}", s.url.as_deref().unwrap_or("-")),
        format!("Views:      {}", s.views),
        format!("Likes:      {}", s.likes),
        format!("Extensions: {}", s.extension_count),
    ];
    if s.is_mock() {
        lines.push("Sample:     yes (placeholder content)".into());
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    marketplace: &Marketplace,
    args: StreamsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        StreamsCommand::List { filter, shop } => {
            let filter = StreamFilter::from(filter);
            let streams = match shop {
                Some(ref shop_id) => marketplace.streams_of_shop(shop_id, filter),
                None => marketplace.streams_for(filter),
            };
            let out = output::render_list(
                &global.output,
                &streams,
                |s| StreamRow::from(s),
                |s| s.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        StreamsCommand::Get { stream } => {
            let found = marketplace.stream(&stream).ok_or_else(|| CliError::NotFound {
                resource_type: "stream".into(),
                identifier: stream.clone(),
                list_command: "streams list".into(),
            })?;
            let out = output::render_single(&global.output, &found, detail, |s| s.id.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        StreamsCommand::Ics { stream, out } => {
            let doc = marketplace.calendar_invite(&stream).await?;
            match out {
                Some(path) => {
                    std::fs::write(&path, doc)?;
                    util::notify(
                        global,
                        &Notice::success(format!("Invitación guardada en {}", path.display())),
                    );
                }
                None => {
                    let mut stdout = std::io::stdout().lock();
                    std::io::Write::write_all(&mut stdout, doc.as_bytes())?;
                }
            }
            Ok(())
        }
    }
}
