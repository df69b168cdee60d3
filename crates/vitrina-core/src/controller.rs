// ── Marketplace controller ──
//
// Session lifecycle over the marketplace API: sign-in, full refreshes,
// command routing with optimistic echoes, and the periodic reel sweep.
// Consumers read derived views; every write goes through `execute`.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::{Mutex, mpsc, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use vitrina_api::types::ReelCreate;
use vitrina_api::{ApiClient, IdentityClient, TransportConfig};

use crate::auth::{AuthService, MIN_PASSWORD_LEN, SignedIn};
use crate::command::{Command, CommandEnvelope, CommandResult};
use crate::config::{Audience, AuthCredentials, MarketplaceConfig};
use crate::convert::{ShopIndex, reel_from_response, shop_index, stream_from_response};
use crate::error::CoreError;
use crate::ics;
use crate::mock::{self, MockDay};
use crate::model::{
    MAX_STREAM_EXTENSIONS, Notification, Reel, Report, Shop, Stream, StreamStatus, UserContext,
};
use crate::selectors::{self, StreamFilter};
use crate::session::{
    GuardedAction, Preview, SessionEvent, SessionState, guard_admin, guard_client_interaction,
    merchant_scope,
};
use crate::store::{DataStore, Snapshot, Subscription};

const COMMAND_CHANNEL_SIZE: usize = 64;

// ── ConnectionState ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
    Failed,
}

// ── Marketplace ──────────────────────────────────────────────────

/// The main entry point for consumers. Cheaply cloneable.
#[derive(Clone)]
pub struct Marketplace {
    inner: Arc<MarketplaceInner>,
}

struct MarketplaceInner {
    config: MarketplaceConfig,
    store: Arc<DataStore>,
    api: Arc<ApiClient>,
    auth: AuthService,
    connection_state: watch::Sender<ConnectionState>,
    command_tx: mpsc::Sender<CommandEnvelope>,
    command_rx: Mutex<Option<mpsc::Receiver<CommandEnvelope>>>,
    cancel: CancellationToken,
    task_handles: Mutex<Vec<JoinHandle<()>>>,
}

impl Marketplace {
    /// Build the HTTP clients. Does NOT connect -- call
    /// [`connect()`](Self::connect) to sign in and load data.
    pub fn new(config: MarketplaceConfig) -> Result<Self, CoreError> {
        let transport = TransportConfig::default().with_timeout(config.timeout);
        let api = Arc::new(ApiClient::new(config.api_url.as_str(), &transport)?);
        let identity = IdentityClient::new(
            config.identity_url.as_str(),
            config.identity_key.clone(),
            &transport,
        )?;
        let auth = AuthService::new(identity, Arc::clone(&api), config.request_uri.clone());

        let (connection_state, _) = watch::channel(ConnectionState::Disconnected);
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_SIZE);

        Ok(Self {
            inner: Arc::new(MarketplaceInner {
                config,
                store: Arc::new(DataStore::new()),
                api,
                auth,
                connection_state,
                command_tx,
                command_rx: Mutex::new(Some(command_rx)),
                cancel: CancellationToken::new(),
                task_handles: Mutex::new(Vec::new()),
            }),
        })
    }

    pub fn config(&self) -> &MarketplaceConfig {
        &self.inner.config
    }

    pub fn store(&self) -> &Arc<DataStore> {
        &self.inner.store
    }

    /// Registration and password reset flows.
    pub fn auth(&self) -> &AuthService {
        &self.inner.auth
    }

    pub fn api(&self) -> &ApiClient {
        &self.inner.api
    }

    // ── Connection lifecycle ─────────────────────────────────────

    /// Sign in with the configured credentials (if any), load all data,
    /// and spawn the background tasks.
    pub async fn connect(&self) -> Result<(), CoreError> {
        self.inner.connection_state.send_replace(ConnectionState::Connecting);

        if let Err(e) = self.sign_in_configured().await {
            self.inner.connection_state.send_replace(ConnectionState::Failed);
            return Err(e);
        }
        if let Err(e) = self.full_refresh().await {
            self.inner.connection_state.send_replace(ConnectionState::Failed);
            return Err(e);
        }

        let config = &self.inner.config;
        let mut handles = self.inner.task_handles.lock().await;

        if let Some(rx) = self.inner.command_rx.lock().await.take() {
            let ctrl = self.clone();
            handles.push(tokio::spawn(command_processor_task(ctrl, rx)));
        }

        if config.refresh_interval_secs > 0 {
            let ctrl = self.clone();
            let cancel = self.inner.cancel.clone();
            handles.push(tokio::spawn(refresh_task(
                ctrl,
                config.refresh_interval_secs,
                cancel,
            )));
        }

        if config.reel_sweep_interval_secs > 0 {
            let store = Arc::clone(&self.inner.store);
            let cancel = self.inner.cancel.clone();
            handles.push(tokio::spawn(reel_sweep_task(
                store,
                config.reel_sweep_interval_secs,
                cancel,
            )));
        }

        self.inner.connection_state.send_replace(ConnectionState::Connected);
        info!(
            signed_in = self.inner.store.session().is_authenticated(),
            "connected to marketplace"
        );
        Ok(())
    }

    /// Cancel background tasks and wait for them to finish.
    pub async fn disconnect(&self) {
        self.inner.cancel.cancel();

        let mut handles = self.inner.task_handles.lock().await;
        for handle in handles.drain(..) {
            let _ = handle.await;
        }

        self.inner
            .connection_state
            .send_replace(ConnectionState::Disconnected);
        debug!("disconnected");
    }

    async fn sign_in_configured(&self) -> Result<(), CoreError> {
        let auth = &self.inner.auth;
        let signed_in = match &self.inner.config.auth {
            AuthCredentials::Anonymous => return Ok(()),
            AuthCredentials::Password {
                audience: Audience::Shop,
                email,
                password,
            } => auth.login_shop(email, password).await?,
            AuthCredentials::Password {
                audience: Audience::Client,
                email,
                password,
            } => auth.login_client(email, password).await?,
            AuthCredentials::Token(token) => auth.resume(token.clone()).await?,
        };
        self.adopt(signed_in);
        Ok(())
    }

    /// Fetch everything, add placeholder content, and replace the store.
    pub async fn full_refresh(&self) -> Result<(), CoreError> {
        let api = &self.inner.api;
        let session = self.inner.store.session();

        let (shops_res, streams_res, reels_res) =
            tokio::join!(api.list_shops(), api.list_streams(), api.list_reels());

        let shops: Vec<Arc<Shop>> = shops_res?
            .into_iter()
            .map(|s| Arc::new(Shop::from(s)))
            .collect();
        let index = shop_index(&shops);
        let mut streams: Vec<Stream> = streams_res?
            .into_iter()
            .map(|s| stream_from_response(s, &index))
            .collect();
        let mut reels: Vec<Reel> = reels_res?
            .into_iter()
            .map(|r| reel_from_response(r, &index))
            .collect();

        let mut snapshot = Snapshot::default();
        if session.is_authenticated() {
            let (notifications_res, me_res) =
                tokio::join!(api.list_notifications(), api.me());
            snapshot.notifications = Some(
                notifications_res?
                    .into_iter()
                    .map(Notification::from)
                    .collect(),
            );
            snapshot.user_context = Some(UserContext::from(me_res?));
            if session.is_admin() {
                snapshot.reports =
                    Some(api.list_reports().await?.into_iter().map(Report::from).collect());
            }
        }

        let mock = self.inner.config.mock;
        if mock.enabled {
            let day = mock.day.unwrap_or_else(MockDay::today);
            let fake_streams = mock::synthesize_streams(&shops, &streams, &day, mock.streams);
            let fake_reels = mock::synthesize_reels(&shops, &reels, &day, Utc::now(), mock.reels);
            debug!(
                streams = fake_streams.len(),
                reels = fake_reels.len(),
                "placeholder content added"
            );
            streams.extend(fake_streams);
            reels.extend(fake_reels);
        }

        // A logout or account switch may have landed mid-fetch.
        if self.inner.store.session().user != session.user {
            debug!("session changed during refresh, dropping private data");
            snapshot.notifications = None;
            snapshot.user_context = None;
            snapshot.reports = None;
        }

        snapshot.shops = shops;
        snapshot.streams = streams;
        snapshot.reels = reels;
        self.inner.store.apply_snapshot(snapshot);
        self.inner.store.prune_expired_reels(Utc::now());

        debug!(
            shops = self.inner.store.shop_count(),
            streams = self.inner.store.stream_count(),
            reels = self.inner.store.reel_count(),
            "data refresh complete"
        );
        Ok(())
    }

    // ── Session ──────────────────────────────────────────────────

    fn adopt(&self, signed_in: SignedIn) {
        let store = &self.inner.store;
        store.apply_session_event(&SessionEvent::Login(signed_in.profile));
        store.user_context.store(Arc::new(signed_in.context));
    }

    pub async fn login_shop(
        &self,
        email: &str,
        password: &secrecy::SecretString,
    ) -> Result<Arc<SessionState>, CoreError> {
        let signed_in = self.inner.auth.login_shop(email, password).await?;
        self.after_login(signed_in).await
    }

    pub async fn login_client(
        &self,
        email: &str,
        password: &secrecy::SecretString,
    ) -> Result<Arc<SessionState>, CoreError> {
        let signed_in = self.inner.auth.login_client(email, password).await?;
        self.after_login(signed_in).await
    }

    pub async fn login_google(
        &self,
        google_id_token: &secrecy::SecretString,
    ) -> Result<Arc<SessionState>, CoreError> {
        let signed_in = self.inner.auth.login_google(google_id_token).await?;
        self.after_login(signed_in).await
    }

    async fn after_login(&self, signed_in: SignedIn) -> Result<Arc<SessionState>, CoreError> {
        self.adopt(signed_in);
        self.full_refresh().await?;
        Ok(self.inner.store.session())
    }

    /// Sign out and forget the account's private data.
    pub fn logout(&self) -> Arc<SessionState> {
        self.inner.auth.sign_out();
        self.inner.store.apply_session_event(&SessionEvent::Logout)
    }

    /// Start an admin preview. Refused for non-admins.
    pub fn enter_preview(&self, preview: Preview) -> Result<Arc<SessionState>, CoreError> {
        let store = &self.inner.store;
        if !store.session().is_admin() {
            return Err(CoreError::NotPermitted {
                message: "La vista previa es solo para administradores.".into(),
            });
        }
        if let Preview::Merchant { shop_id } = &preview {
            if store.shop_by_id(shop_id).is_none() {
                return Err(CoreError::not_found("Shop", shop_id.clone()));
            }
        }
        Ok(store.apply_session_event(&SessionEvent::EnterPreview(preview)))
    }

    pub fn exit_preview(&self) -> Arc<SessionState> {
        self.inner
            .store
            .apply_session_event(&SessionEvent::ExitPreview)
    }

    pub fn session(&self) -> Arc<SessionState> {
        self.inner.store.session()
    }

    pub fn user_context(&self) -> Arc<UserContext> {
        self.inner.store.user_context()
    }

    // ── Command execution ────────────────────────────────────────

    /// Execute a command through the command processor task.
    pub async fn execute(&self, cmd: Command) -> Result<CommandResult, CoreError> {
        if *self.inner.connection_state.borrow() != ConnectionState::Connected {
            return Err(CoreError::Disconnected);
        }

        let (tx, rx) = tokio::sync::oneshot::channel();
        self.inner
            .command_tx
            .send(CommandEnvelope {
                command: cmd,
                response_tx: tx,
            })
            .await
            .map_err(|_| CoreError::Disconnected)?;

        rx.await.map_err(|_| CoreError::Disconnected)?
    }

    // ── One-shot convenience ─────────────────────────────────────

    /// Connect, run the closure, disconnect. No periodic tasks and no
    /// post-mutation refresh: a single request-response cycle.
    pub async fn oneshot<F, Fut, T>(config: MarketplaceConfig, f: F) -> Result<T, CoreError>
    where
        F: FnOnce(Marketplace) -> Fut,
        Fut: std::future::Future<Output = Result<T, CoreError>>,
    {
        let mut cfg = config;
        cfg.refresh_interval_secs = 0;
        cfg.reel_sweep_interval_secs = 0;
        cfg.refresh_after_mutation = false;

        let marketplace = Marketplace::new(cfg)?;
        marketplace.connect().await?;
        let result = f(marketplace.clone()).await;
        marketplace.disconnect().await;
        result
    }

    // ── State observation ────────────────────────────────────────

    pub fn connection_state(&self) -> watch::Receiver<ConnectionState> {
        self.inner.connection_state.subscribe()
    }

    pub fn shops(&self) -> Subscription<Shop> {
        self.inner.store.subscribe_shops()
    }

    pub fn streams(&self) -> Subscription<Stream> {
        self.inner.store.subscribe_streams()
    }

    pub fn reels(&self) -> Subscription<Reel> {
        self.inner.store.subscribe_reels()
    }

    // ── Derived views ────────────────────────────────────────────

    pub fn shops_snapshot(&self) -> Arc<Vec<Arc<Shop>>> {
        self.inner.store.shops_snapshot()
    }

    /// Public shops, ranked.
    pub fn public_shops(&self) -> Vec<Arc<Shop>> {
        selectors::rank_shops(&selectors::public_shops(&self.shops_snapshot()))
    }

    /// Public shops matching `query`, ranked.
    pub fn search_shops(&self, query: &str) -> Vec<Arc<Shop>> {
        selectors::search_shops(&self.public_shops(), query)
    }

    pub fn shop(&self, id: &str) -> Option<Arc<Shop>> {
        self.inner.store.shop_by_id(id)
    }

    pub fn streams_for(&self, filter: StreamFilter) -> Vec<Arc<Stream>> {
        selectors::rank_streams(&self.inner.store.streams_snapshot(), filter)
    }

    pub fn streams_of_shop(&self, shop_id: &str, filter: StreamFilter) -> Vec<Arc<Stream>> {
        selectors::streams_of_shop(&self.inner.store.streams_snapshot(), shop_id, filter)
    }

    pub fn stream(&self, id: &str) -> Option<Arc<Stream>> {
        self.inner.store.stream_by_id(id)
    }

    pub fn active_reels(&self) -> Vec<Arc<Reel>> {
        selectors::active_reels(&self.inner.store.reels_snapshot(), Utc::now())
    }

    pub fn notifications(&self) -> Vec<Arc<Notification>> {
        self.inner.store.notifications_snapshot()
    }

    pub fn unread_notifications(&self) -> usize {
        selectors::unread_count(&self.notifications())
    }

    pub fn reports(&self) -> Arc<Vec<Arc<Report>>> {
        self.inner.store.reports_snapshot()
    }

    /// Calendar invite for a stream: the API's rendering when available,
    /// otherwise generated locally.
    pub async fn calendar_invite(&self, stream_id: &str) -> Result<String, CoreError> {
        let local = self.inner.store.stream_by_id(stream_id);
        if !mock::is_mock_id(stream_id) {
            match self.inner.api.stream_calendar_invite(stream_id).await {
                Ok(doc) => return Ok(doc),
                Err(e) => {
                    debug!(error = %e, stream_id, "invite endpoint failed, rendering locally");
                }
            }
        }
        local
            .map(|s| ics::calendar_invite(&s, Utc::now()))
            .ok_or_else(|| CoreError::not_found("Stream", stream_id))
    }

    fn spawn_background_refresh(&self) {
        let ctrl = self.clone();
        let cancel = self.inner.cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {}
                res = ctrl.full_refresh() => {
                    if let Err(e) = res {
                        warn!(error = %e, "background refresh failed");
                    }
                }
            }
        });
    }
}

// ── Background tasks ─────────────────────────────────────────────

/// Periodically refresh data from the API.
async fn refresh_task(marketplace: Marketplace, interval_secs: u64, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.tick().await;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = marketplace.full_refresh().await {
                    warn!(error = %e, "periodic refresh failed");
                }
            }
        }
    }
}

/// Periodically drop expired reels from the store.
async fn reel_sweep_task(store: Arc<DataStore>, interval_secs: u64, cancel: CancellationToken) {
    let mut interval = tokio::time::interval(Duration::from_secs(interval_secs));
    interval.tick().await;

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            _ = interval.tick() => {
                store.prune_expired_reels(Utc::now());
            }
        }
    }
}

async fn command_processor_task(marketplace: Marketplace, mut rx: mpsc::Receiver<CommandEnvelope>) {
    let cancel = marketplace.inner.cancel.clone();

    loop {
        tokio::select! {
            biased;
            () = cancel.cancelled() => break,
            envelope = rx.recv() => {
                let Some(envelope) = envelope else { break };
                let refreshes = envelope.command.refreshes();
                let result = route_command(&marketplace, envelope.command).await;
                if let Err(ref e) = result {
                    debug!(error = %e, "command failed");
                } else if refreshes && marketplace.inner.config.refresh_after_mutation {
                    marketplace.spawn_background_refresh();
                }
                let _ = envelope.response_tx.send(result);
            }
        }
    }
}

// ── Command routing ──────────────────────────────────────────────

/// Run the client-side guards for `cmd`, call the API, and echo the
/// server's answer into the store.
#[allow(clippy::too_many_lines)]
async fn route_command(marketplace: &Marketplace, cmd: Command) -> Result<CommandResult, CoreError> {
    let api = &marketplace.inner.api;
    let store = &marketplace.inner.store;
    let session = store.session();

    match cmd {
        // ── Client interactions ──────────────────────────────────

        Command::ToggleFavorite { shop_id } => {
            guard_client_interaction(&session)?;
            let resp = api.toggle_favorite(&shop_id).await?;
            let added = resp.favorites.contains(&shop_id);
            let favorites = resp.favorites;
            store.echo_user_context(|ctx| ctx.favorites.clone_from(&favorites));
            Ok(CommandResult::Favorites { favorites, added })
        }

        Command::ToggleReminder { stream_id } => {
            guard_client_interaction(&session)?;
            reject_placeholder(&stream_id)?;
            let resp = api.toggle_reminder(&stream_id).await?;
            let added = resp.reminders.contains(&stream_id);
            let upcoming = store
                .stream_by_id(&stream_id)
                .is_some_and(|s| s.status == StreamStatus::Upcoming);
            let reminders = resp.reminders;
            store.echo_user_context(|ctx| ctx.reminders.clone_from(&reminders));
            Ok(CommandResult::Reminders {
                reminders,
                added,
                offer_invite: added && upcoming,
            })
        }

        Command::ToggleLike { stream_id } => {
            guard_client_interaction(&session)?;
            reject_placeholder(&stream_id)?;
            let resp = api.toggle_like(&stream_id).await?;
            let liked = resp.liked_streams.contains(&stream_id);
            let liked_streams = resp.liked_streams;
            store.echo_user_context(|ctx| ctx.liked_streams.clone_from(&liked_streams));
            store.echo_stream_likes(&stream_id, resp.likes);
            Ok(CommandResult::Like {
                liked,
                likes: resp.likes,
            })
        }

        Command::ReportStream { stream_id, reason } => {
            guard_client_interaction(&session)?;
            reject_placeholder(&stream_id)?;
            if store.user_context().has_reported(&stream_id) {
                return Err(CoreError::ValidationFailed {
                    message: "Ya denunciaste este vivo.".into(),
                });
            }
            let reason = reason.trim();
            if reason.is_empty() {
                return Err(CoreError::ValidationFailed {
                    message: "Contanos el motivo de la denuncia.".into(),
                });
            }
            let resp = api.report_stream(&stream_id, reason).await?;
            let reported = resp.reported_streams;
            store.echo_user_context(|ctx| ctx.reported_streams.clone_from(&reported));
            Ok(CommandResult::Ok)
        }

        Command::MarkReelViewed { reel_id } => {
            // Views are only persisted for real reels and client accounts.
            if mock::is_mock_id(&reel_id) || !session.can_client_interact() {
                return Ok(CommandResult::Ok);
            }
            let resp = api.mark_reel_viewed(&reel_id).await?;
            let viewed = resp.viewed_reels;
            store.echo_user_context(|ctx| ctx.viewed_reels.clone_from(&viewed));
            Ok(CommandResult::Ok)
        }

        Command::MarkNotificationRead { id } => {
            require_signed_in(&session)?;
            api.mark_notification_read(&id).await?;
            store.echo_notifications_read(Some(&id));
            Ok(CommandResult::Ok)
        }

        Command::MarkAllNotificationsRead => {
            require_signed_in(&session)?;
            api.mark_all_notifications_read().await?;
            store.echo_notifications_read(None);
            Ok(CommandResult::Ok)
        }

        // ── Merchant ─────────────────────────────────────────────

        Command::CreateStream(request) => {
            let shop_id =
                merchant_scope(&session, GuardedAction::CreateStream, request.shop_id.as_deref())?;
            request.validate()?;
            let resp = api.create_stream(&request.to_wire(shop_id)).await?;
            let stream = stream_from_response(resp, &current_index(store));
            Ok(CommandResult::Stream(echo_stream(store, stream)))
        }

        Command::UpdateStream { stream_id, request } => {
            let existing = owned_stream(store, &stream_id)?;
            let shop_id =
                merchant_scope(&session, GuardedAction::UpdateStream, Some(&existing.shop.id))?;
            request.validate()?;
            let resp = api
                .update_stream(&stream_id, &request.to_wire(shop_id))
                .await?;
            let stream = stream_from_response(resp, &current_index(store));
            Ok(CommandResult::Stream(echo_stream(store, stream)))
        }

        Command::CancelStream { stream_id } => {
            let existing = owned_stream(store, &stream_id)?;
            merchant_scope(&session, GuardedAction::CancelStream, Some(&existing.shop.id))?;
            if existing.status.is_over() || !existing.status.is_listable() {
                return Err(CoreError::ValidationFailed {
                    message: "Este vivo ya no se puede cancelar.".into(),
                });
            }
            let resp = api.cancel_stream(&stream_id).await?;
            let stream = stream_from_response(resp, &current_index(store));
            Ok(CommandResult::Stream(echo_stream(store, stream)))
        }

        Command::ExtendStream { stream_id } => {
            let existing = owned_stream(store, &stream_id)?;
            merchant_scope(&session, GuardedAction::ExtendStream, Some(&existing.shop.id))?;
            if existing.extension_count >= MAX_STREAM_EXTENSIONS {
                return Err(CoreError::ExtensionLimit {
                    stream_id,
                    max: MAX_STREAM_EXTENSIONS,
                });
            }
            if existing.status != StreamStatus::Live {
                return Err(CoreError::ValidationFailed {
                    message: "Solo se pueden extender vivos en curso.".into(),
                });
            }
            let resp = api.extend_stream(&stream_id).await?;
            let stream = stream_from_response(resp, &current_index(store));
            Ok(CommandResult::Stream(echo_stream(store, stream)))
        }

        Command::UpdateShop { shop_id, update } => {
            let shop_id =
                merchant_scope(&session, GuardedAction::UpdateShop, shop_id.as_deref())?;
            if update.is_empty() {
                return Err(CoreError::ValidationFailed {
                    message: "No hay cambios para guardar.".into(),
                });
            }
            let resp = api.update_shop(&shop_id, &update.into()).await?;
            Ok(CommandResult::Shop(echo_shop(store, Shop::from(resp))))
        }

        Command::BuyQuota { shop_id, amount } => {
            let shop_id = merchant_scope(&session, GuardedAction::BuyQuota, shop_id.as_deref())?;
            if amount == 0 {
                return Err(CoreError::ValidationFailed {
                    message: "Elegí al menos un cupo.".into(),
                });
            }
            let resp = api.buy_quota(&shop_id, amount).await?;
            Ok(CommandResult::Shop(echo_shop(store, Shop::from(resp))))
        }

        Command::CreateReel { shop_id, url } => {
            let shop_id = merchant_scope(&session, GuardedAction::CreateReel, shop_id.as_deref())?;
            if url::Url::parse(url.trim()).is_err() {
                return Err(CoreError::ValidationFailed {
                    message: "El enlace del reel no es una URL válida.".into(),
                });
            }
            let body = ReelCreate {
                shop_id,
                url: url.trim().to_owned(),
            };
            let resp = api.create_reel(&body).await?;
            let reel = Arc::new(reel_from_response(resp, &current_index(store)));
            store.echo_reel((*reel).clone());
            Ok(CommandResult::Reel(reel))
        }

        // ── Administration ───────────────────────────────────────

        Command::SetShopStatus { shop_id, status } => {
            guard_admin(&session)?;
            let resp = api.set_shop_status(&shop_id, &status.to_string()).await?;
            Ok(CommandResult::Shop(echo_shop(store, Shop::from(resp))))
        }

        Command::BanStream { stream_id } => {
            guard_admin(&session)?;
            reject_placeholder(&stream_id)?;
            let resp = api.ban_stream(&stream_id).await?;
            let stream = stream_from_response(resp, &current_index(store));
            Ok(CommandResult::Stream(echo_stream(store, stream)))
        }

        Command::ResolveReport { report_id } => {
            guard_admin(&session)?;
            let report = Report::from(api.resolve_report(&report_id).await?);
            store.echo_report(report.clone());
            Ok(CommandResult::Report(report))
        }

        Command::ResetShopPassword {
            shop_id,
            new_password,
        } => {
            guard_admin(&session)?;
            if secrecy::ExposeSecret::expose_secret(&new_password).chars().count()
                < MIN_PASSWORD_LEN
            {
                return Err(CoreError::ValidationFailed {
                    message: format!(
                        "La contraseña debe tener al menos {MIN_PASSWORD_LEN} caracteres."
                    ),
                });
            }
            api.reset_shop_password(&shop_id, &new_password).await?;
            Ok(CommandResult::Ok)
        }

        Command::AssignShopOwner { shop_id, email } => {
            guard_admin(&session)?;
            let email = email.trim();
            if !email.contains('@') {
                return Err(CoreError::ValidationFailed {
                    message: "El correo no es válido.".into(),
                });
            }
            let resp = api.assign_shop_owner(&shop_id, email).await?;
            Ok(CommandResult::Shop(echo_shop(store, Shop::from(resp))))
        }
    }
}

// ── Helpers ──────────────────────────────────────────────────────

fn reject_placeholder(id: &str) -> Result<(), CoreError> {
    if mock::is_mock_id(id) {
        return Err(CoreError::PlaceholderContent { id: id.to_owned() });
    }
    Ok(())
}

fn require_signed_in(session: &SessionState) -> Result<(), CoreError> {
    if session.is_authenticated() {
        Ok(())
    } else {
        Err(CoreError::NotSignedIn)
    }
}

/// A real stream known to the store.
fn owned_stream(store: &DataStore, stream_id: &str) -> Result<Arc<Stream>, CoreError> {
    reject_placeholder(stream_id)?;
    store
        .stream_by_id(stream_id)
        .ok_or_else(|| CoreError::not_found("Stream", stream_id))
}

fn current_index(store: &DataStore) -> ShopIndex {
    shop_index(&store.shops_snapshot())
}

fn echo_stream(store: &DataStore, stream: Stream) -> Arc<Stream> {
    let stream = Arc::new(stream);
    store.echo_stream((*stream).clone());
    stream
}

fn echo_shop(store: &DataStore, shop: Shop) -> Arc<Shop> {
    let shop = Arc::new(shop);
    store.echo_shop((*shop).clone());
    shop
}
