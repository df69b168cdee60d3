//! Sign-in, registration and password reset handlers.

use vitrina_core::auth::ResetState;
use vitrina_core::routing;
use vitrina_core::{CoreError, Marketplace, MarketplaceConfig, Notice};

use crate::cli::{AudienceArg, AuthArgs, AuthCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

const RESET_ATTEMPTS: usize = 3;

pub async fn handle(
    config: MarketplaceConfig,
    args: AuthArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let marketplace = Marketplace::new(config)?;

    match args.command {
        AuthCommand::Login { audience, email } => {
            let password = util::prompt_secret("Contraseña: ")?;
            marketplace.connect().await?;
            let session = match audience {
                AudienceArg::Shop => marketplace.login_shop(&email, &password).await,
                AudienceArg::Client => marketplace.login_client(&email, &password).await,
            };
            let session = match session {
                Ok(s) => s,
                Err(e) => {
                    util::notify(global, &e.notice());
                    marketplace.disconnect().await;
                    return Err(e.into());
                }
            };

            let user = session.effective_user();
            let home = routing::post_login_destination(&session, None);
            let summary = format!(
                "Signed in as {} ({:?}){}\nHome: {home}",
                session.user.as_ref().and_then(|u| u.email.as_deref()).unwrap_or("-"),
                user.mode,
                user.shop_id
                    .as_deref()
                    .map(|s| format!(", shop {s}"))
                    .unwrap_or_default(),
            );
            output::print_output(&summary, global.quiet);
            marketplace.disconnect().await;
            Ok(())
        }

        AuthCommand::Register { email } => {
            let password = util::prompt_secret("Contraseña: ")?;
            let confirmation = util::prompt_secret("Repetí la contraseña: ")?;
            let notice = marketplace
                .auth()
                .register_client(&email, &password, &confirmation)
                .await?;
            util::notify(global, &notice);
            Ok(())
        }

        AuthCommand::ResetRequest { email } => {
            let notice = marketplace.auth().request_password_reset(&email).await?;
            util::notify(global, &notice);
            Ok(())
        }

        AuthCommand::ResetConfirm { code } => reset_confirm(&marketplace, code, global).await,
    }
}

/// Drive the reset flow: verify the code, collect the new password, submit.
async fn reset_confirm(
    marketplace: &Marketplace,
    code: String,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let auth = marketplace.auth();
    let mut state = ResetState::begin(Some(code));
    if let Some(code) = state.code().map(str::to_owned) {
        state = state.verified(auth.verify_reset_code(&code).await);
    }

    for _ in 0..RESET_ATTEMPTS {
        let ResetState::Ready { ref code, ref email } = state else {
            break;
        };
        util::notify(global, &Notice::info(format!("Nueva contraseña para {email}")));
        let password = util::prompt_secret("Contraseña: ")?;
        let confirmation = util::prompt_secret("Repetí la contraseña: ")?;
        let code = code.clone();
        let result = auth
            .confirm_password_reset(&code, &password, &confirmation)
            .await;
        if let Err(CoreError::ValidationFailed { ref message }) = result {
            util::notify(global, &Notice::warning(message.clone()));
        }
        state = state.completed(result);
    }

    match state {
        ResetState::Success { email } => {
            util::notify(
                global,
                &Notice::success(format!("Contraseña actualizada. Ya podés ingresar como {email}.")),
            );
            Ok(())
        }
        ResetState::Error(failure) => Err(CliError::AuthFailed {
            message: failure.message(),
        }),
        _ => Err(CliError::Validation {
            field: "password".into(),
            reason: "no se pudo completar el cambio de contraseña".into(),
        }),
    }
}
