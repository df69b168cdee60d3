//! Shop owner command handlers.

use vitrina_core::{
    Command as CoreCommand, CommandResult, Marketplace, Notice, StreamRequest, UpdateShopRequest,
};

use crate::cli::{GlobalOpts, MerchantArgs, MerchantCommand, StreamFields};
use crate::error::CliError;
use crate::output;

use super::util;

fn stream_request(shop_id: Option<String>, fields: StreamFields) -> Result<StreamRequest, CliError> {
    Ok(StreamRequest {
        shop_id,
        scheduled_at: util::parse_time("at", &fields.at)?,
        title: fields.title,
        platform: fields.platform,
        url: fields.url,
    })
}

/// Print the entity a merchant command returned.
fn print_result(result: &CommandResult, global: &GlobalOpts) {
    let out = match result {
        CommandResult::Stream(s) => output::render_single(
            &global.output,
            s,
            |s| format!("{}  {}  {}  {}", s.id, s.status, util::fmt_local(s.scheduled_at), s.title),
            |s| s.id.clone(),
        ),
        CommandResult::Shop(s) => output::render_single(
            &global.output,
            s,
            |s| {
                format!(
                    "{}  {}  streams {}/{}",
                    s.id,
                    s.name,
                    s.stream_quota.used,
                    s.stream_quota.total()
                )
            },
            |s| s.id.clone(),
        ),
        CommandResult::Reel(r) => {
            output::render_single(&global.output, r, |r| r.id.clone(), |r| r.id.clone())
        }
        _ => String::new(),
    };
    output::print_output(&out, global.quiet);
}

pub async fn handle(
    marketplace: &Marketplace,
    args: MerchantArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let shop = args.shop;
    let (command, done) = match args.command {
        MerchantCommand::CreateStream(fields) => (
            CoreCommand::CreateStream(stream_request(shop, fields)?),
            "Vivo programado.",
        ),

        MerchantCommand::UpdateStream { stream, fields } => (
            CoreCommand::UpdateStream {
                stream_id: stream,
                request: stream_request(shop, fields)?,
            },
            "Vivo actualizado.",
        ),

        MerchantCommand::CancelStream { stream } => {
            if !util::confirm(&format!("¿Cancelar el vivo {stream}?"), global.yes)? {
                return Ok(());
            }
            (
                CoreCommand::CancelStream { stream_id: stream },
                "Vivo cancelado.",
            )
        }

        MerchantCommand::ExtendStream { stream } => (
            CoreCommand::ExtendStream { stream_id: stream },
            "Vivo extendido.",
        ),

        MerchantCommand::BuyQuota { amount } => (
            CoreCommand::BuyQuota {
                shop_id: shop,
                amount,
            },
            "Cupos acreditados.",
        ),

        MerchantCommand::CreateReel { url } => (
            CoreCommand::CreateReel { shop_id: shop, url },
            "Reel publicado por 24 horas.",
        ),

        MerchantCommand::UpdateShop {
            name,
            address,
            whatsapp,
            instagram,
            website,
            logo_url,
        } => (
            CoreCommand::UpdateShop {
                shop_id: shop,
                update: UpdateShopRequest {
                    name,
                    address,
                    whatsapp,
                    instagram,
                    website,
                    logo_url,
                    ..UpdateShopRequest::default()
                },
            },
            "Datos de la tienda guardados.",
        ),
    };

    let result = marketplace.execute(command).await?;
    print_result(&result, global);
    util::notify(global, &Notice::success(done));
    Ok(())
}
