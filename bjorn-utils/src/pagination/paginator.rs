//! Generic paginator: fetches a full collection, slices one page, renders it
//! through caller callbacks and emits navigation controls carrying the state.

use std::{fmt, sync::Arc};

use futures::future::{BoxFuture, FutureExt};
use tracing::{debug, warn};
use twilight_model::channel::message::{component::Component, embed::Embed};

use super::components::{build_jump_input, build_nav_components};
use super::page::{clamp_page, page_slice, parse_one_based_page, step_page, total_pages};
use super::token::{
    ControlKind, ExtraData, PaginationState, PaginationToken, TokenError, decode, encode,
};

/// Longest accepted paginator prefix; leaves room for state in the custom ID.
pub const MAX_PREFIX_LEN: usize = 30;

/// Title of the jump-to-page modal.
pub const JUMP_MODAL_TITLE: &str = "Go to Page";

/// Loads the entire collection for a state's extra data, in a stable order.
pub type DataGetter<T> =
    Arc<dyn Fn(&PaginationState) -> BoxFuture<'static, anyhow::Result<Vec<T>>> + Send + Sync>;

/// Renders the first page of a new message.
pub type CreatePage<T> =
    Arc<dyn Fn(&PaginationState, &[T]) -> anyhow::Result<Embed> + Send + Sync>;

/// Renders a page, optionally on top of the previously shown embed.
pub type UpdatePage<T> =
    Arc<dyn Fn(&PaginationState, &[T], Option<Embed>) -> anyhow::Result<Embed> + Send + Sync>;

/// Errors surfaced by paginator operations.
#[derive(Debug, thiserror::Error)]
pub enum PaginationError {
    #[error(transparent)]
    Token(#[from] TokenError),
    #[error("custom ID belongs to paginator `{found}`, not `{expected}`")]
    ForeignIdentifier { expected: String, found: String },
    #[error("failed to load page data: {0:#}")]
    Fetch(anyhow::Error),
    #[error("failed to render page: {0:#}")]
    Render(anyhow::Error),
}

/// Invalid paginator or registry configuration, detected before serving traffic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("paginator prefix is required")]
    MissingPrefix,
    #[error("paginator prefix `{0}` must not contain spaces")]
    InvalidPrefix(String),
    #[error("paginator prefix `{0}` is longer than {MAX_PREFIX_LEN} characters")]
    PrefixTooLong(String),
    #[error("paginator `{0}` needs at least one item per page")]
    ZeroItemsPerPage(String),
    #[error("paginator `{0}` has no data getter")]
    MissingDataGetter(String),
    #[error("paginator `{0}` has no update callback")]
    MissingUpdate(String),
    #[error("paginator prefix `{0}` is registered twice")]
    DuplicatePrefix(String),
}

/// A rendered page plus its navigation controls.
#[derive(Debug, Clone)]
pub struct PageView {
    pub embed: Embed,
    pub components: Vec<Component>,
    pub state: PaginationState,
}

/// Data needed to open the jump-to-page modal.
#[derive(Debug, Clone)]
pub struct JumpPrompt {
    pub custom_id: String,
    pub title: String,
    pub components: Vec<Component>,
    pub total_pages: usize,
}

/// Result of applying one interaction to a paginator.
#[derive(Debug, Clone)]
pub enum Transition {
    /// Replace the message with a freshly rendered page.
    Render(PageView),
    /// Open the jump-to-page modal.
    Prompt(JumpPrompt),
    /// Input was rejected; show the notice and leave the message unchanged.
    Rejected(String),
}

/// Paginator over items of type `T`.
///
/// Holds no per-session state: every interaction is resolved from the
/// decoded custom ID alone.
pub struct Paginator<T> {
    prefix: String,
    items_per_page: usize,
    extra_keys: Vec<String>,
    data_getter: DataGetter<T>,
    create_page: Option<CreatePage<T>>,
    update_page: UpdatePage<T>,
}

impl<T> fmt::Debug for Paginator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Paginator")
            .field("prefix", &self.prefix)
            .field("items_per_page", &self.items_per_page)
            .field("extra_keys", &self.extra_keys)
            .field("has_create_page", &self.create_page.is_some())
            .finish_non_exhaustive()
    }
}

impl<T> Paginator<T>
where
    T: Send + Sync + 'static,
{
    /// Start configuring a paginator identified by `prefix`.
    pub fn builder(prefix: impl Into<String>) -> PaginatorBuilder<T> {
        PaginatorBuilder::new(prefix)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Render page 0 of a new paginated message for `extra_data`.
    pub async fn setup(&self, extra_data: ExtraData) -> Result<PageView, PaginationError> {
        let mut state = PaginationState::new(0, 0, extra_data);
        // Reject unusable extra data before spending an upstream fetch on it.
        encode(&self.prefix, ControlKind::Prev, &state, &self.extra_keys)?;

        let items = self.fetch(&state).await?;
        state.total_pages = total_pages(items.len(), self.items_per_page);

        let page_items = page_slice(&items, self.items_per_page, state.current_page);
        let embed = match &self.create_page {
            Some(create_page) => create_page(&state, page_items),
            None => (self.update_page)(&state, page_items, None),
        }
        .map_err(PaginationError::Render)?;

        debug!(
            prefix = %self.prefix,
            total_pages = state.total_pages,
            "paginated message created"
        );
        self.view(state, embed)
    }

    /// Re-render `state` against freshly fetched data.
    ///
    /// The page count is recomputed from the fetched collection and the page
    /// clamped into it, so controls never disagree with the rendered page.
    pub async fn update(
        &self,
        mut state: PaginationState,
        previous: Option<Embed>,
    ) -> Result<PageView, PaginationError> {
        let items = self.fetch(&state).await?;

        let fresh_total = total_pages(items.len(), self.items_per_page);
        if fresh_total != state.total_pages {
            debug!(
                prefix = %self.prefix,
                encoded = state.total_pages,
                fresh = fresh_total,
                "page count changed since the controls were issued"
            );
        }
        state.total_pages = fresh_total;
        state.current_page = clamp_page(state.current_page, fresh_total);

        let page_items = page_slice(&items, self.items_per_page, state.current_page);
        let embed =
            (self.update_page)(&state, page_items, previous).map_err(PaginationError::Render)?;

        self.view(state, embed)
    }

    /// Move `delta` pages, clamping at the first and last page.
    pub fn step(&self, mut state: PaginationState, delta: isize) -> PaginationState {
        state.current_page = step_page(state.current_page, delta, state.total_pages);
        state
    }

    /// Decode a custom ID issued by this paginator.
    pub fn decode(&self, custom_id: &str) -> Result<PaginationToken, PaginationError> {
        let token = decode(custom_id, &self.extra_keys)?;
        if token.prefix != self.prefix {
            return Err(PaginationError::ForeignIdentifier {
                expected: self.prefix.clone(),
                found: token.prefix,
            });
        }
        Ok(token)
    }

    /// Build the jump modal for `state`; its custom ID carries the state back.
    pub fn jump_prompt(&self, state: &PaginationState) -> Result<JumpPrompt, PaginationError> {
        Ok(JumpPrompt {
            custom_id: encode(&self.prefix, ControlKind::JumpModal, state, &self.extra_keys)?,
            title: JUMP_MODAL_TITLE.to_owned(),
            components: build_jump_input(state.total_pages),
            total_pages: state.total_pages,
        })
    }

    /// Apply one interaction: a button press or a jump-modal submission.
    ///
    /// `input` is the text typed into the jump modal, `previous` the embed of
    /// the message the control belongs to.
    pub async fn transition(
        &self,
        custom_id: &str,
        input: Option<&str>,
        previous: Option<Embed>,
    ) -> Result<Transition, PaginationError> {
        let token = self.decode(custom_id)?;
        debug!(
            prefix = %self.prefix,
            control = %token.kind,
            page = token.state.current_page,
            "pagination control used"
        );

        match token.kind {
            ControlKind::Prev => {
                let state = self.step(token.state, -1);
                Ok(Transition::Render(self.update(state, previous).await?))
            }
            ControlKind::Next => {
                let state = self.step(token.state, 1);
                Ok(Transition::Render(self.update(state, previous).await?))
            }
            ControlKind::JumpButton => Ok(Transition::Prompt(self.jump_prompt(&token.state)?)),
            ControlKind::JumpModal => {
                let mut state = token.state;
                let Some(target) =
                    input.and_then(|raw| parse_one_based_page(raw, state.total_pages))
                else {
                    warn!(prefix = %self.prefix, input = ?input, "rejected jump target");
                    return Ok(Transition::Rejected(invalid_jump_message(state.total_pages)));
                };

                state.current_page = target;
                Ok(Transition::Render(self.update(state, previous).await?))
            }
        }
    }

    async fn fetch(&self, state: &PaginationState) -> Result<Vec<T>, PaginationError> {
        (self.data_getter)(state)
            .await
            .map_err(PaginationError::Fetch)
    }

    /// Controls are encoded with the fetched page count, which may be longer
    /// than the one checked before fetching; an overlong ID is a render error.
    fn view(&self, state: PaginationState, embed: Embed) -> Result<PageView, PaginationError> {
        let components = build_nav_components(&self.prefix, &state, &self.extra_keys)
            .map_err(|source| PaginationError::Render(source.into()))?;
        Ok(PageView {
            embed,
            components,
            state,
        })
    }
}

/// User-facing notice for an out-of-range or non-numeric jump target.
pub fn invalid_jump_message(total_pages: usize) -> String {
    format!(
        "Invalid page number. Please enter a number between 1 and {} (including the end values).",
        total_pages.max(1)
    )
}

/// Object-safe view of a [`Paginator`], so paginators over different item
/// types can share one router.
pub trait PaginationHandler: Send + Sync {
    fn prefix(&self) -> &str;

    fn handle<'a>(
        &'a self,
        custom_id: &'a str,
        input: Option<&'a str>,
        previous: Option<Embed>,
    ) -> BoxFuture<'a, Result<Transition, PaginationError>>;
}

impl<T> PaginationHandler for Paginator<T>
where
    T: Send + Sync + 'static,
{
    fn prefix(&self) -> &str {
        &self.prefix
    }

    fn handle<'a>(
        &'a self,
        custom_id: &'a str,
        input: Option<&'a str>,
        previous: Option<Embed>,
    ) -> BoxFuture<'a, Result<Transition, PaginationError>> {
        self.transition(custom_id, input, previous).boxed()
    }
}

/// Fluent configuration for a [`Paginator`].
pub struct PaginatorBuilder<T> {
    prefix: String,
    items_per_page: usize,
    extra_keys: Vec<String>,
    data_getter: Option<DataGetter<T>>,
    create_page: Option<CreatePage<T>>,
    update_page: Option<UpdatePage<T>>,
}

impl<T> PaginatorBuilder<T>
where
    T: Send + Sync + 'static,
{
    /// Default page size when [`PaginatorBuilder::items_per_page`] is not called.
    pub const DEFAULT_ITEMS_PER_PAGE: usize = 5;

    fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            items_per_page: Self::DEFAULT_ITEMS_PER_PAGE,
            extra_keys: Vec::new(),
            data_getter: None,
            create_page: None,
            update_page: None,
        }
    }

    pub fn items_per_page(mut self, items_per_page: usize) -> Self {
        self.items_per_page = items_per_page;
        self
    }

    /// Append an extra key; values are encoded in the order keys are added.
    pub fn extra_key(mut self, key: impl Into<String>) -> Self {
        self.extra_keys.push(key.into());
        self
    }

    pub fn data_getter<F, Fut>(mut self, getter: F) -> Self
    where
        F: Fn(&PaginationState) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Vec<T>>> + Send + 'static,
    {
        self.data_getter = Some(Arc::new(move |state: &PaginationState| getter(state).boxed()));
        self
    }

    pub fn on_create<F>(mut self, create_page: F) -> Self
    where
        F: Fn(&PaginationState, &[T]) -> anyhow::Result<Embed> + Send + Sync + 'static,
    {
        self.create_page = Some(Arc::new(create_page));
        self
    }

    pub fn on_update<F>(mut self, update_page: F) -> Self
    where
        F: Fn(&PaginationState, &[T], Option<Embed>) -> anyhow::Result<Embed>
            + Send
            + Sync
            + 'static,
    {
        self.update_page = Some(Arc::new(update_page));
        self
    }

    /// Validate the configuration and produce the paginator.
    pub fn build(self) -> Result<Paginator<T>, ConfigError> {
        if self.prefix.is_empty() {
            return Err(ConfigError::MissingPrefix);
        }
        if self.prefix.contains(char::is_whitespace) {
            return Err(ConfigError::InvalidPrefix(self.prefix));
        }
        if self.prefix.len() > MAX_PREFIX_LEN {
            return Err(ConfigError::PrefixTooLong(self.prefix));
        }
        if self.items_per_page == 0 {
            return Err(ConfigError::ZeroItemsPerPage(self.prefix));
        }
        let Some(data_getter) = self.data_getter else {
            return Err(ConfigError::MissingDataGetter(self.prefix));
        };
        let Some(update_page) = self.update_page else {
            return Err(ConfigError::MissingUpdate(self.prefix));
        };

        Ok(Paginator {
            prefix: self.prefix,
            items_per_page: self.items_per_page,
            extra_keys: self.extra_keys,
            data_getter,
            create_page: self.create_page,
            update_page,
        })
    }
}
