//! Movie catalog with "now showing" and "coming soon" tabs.

use crate::environment::BookingEnvironment;
use crate::fetch::{Chain, Generation};
use cineplex_api::{ApiError, Movie, MovieStatus};
use cineplex_core::{Effects, effect::Effect, reducer::Reducer};
use cineplex_runtime::Store;
use smallvec::smallvec;

/// Movies of the active tab.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CatalogState {
    tab: MovieStatus,
    movies: Chain<Movie>,
}

impl CatalogState {
    /// Catalog opened on `tab`
    #[must_use]
    pub fn new(tab: MovieStatus) -> Self {
        Self {
            tab,
            movies: Chain::default(),
        }
    }

    /// Active tab
    #[must_use]
    pub const fn tab(&self) -> MovieStatus {
        self.tab
    }

    /// Movies of the active tab
    #[must_use]
    pub const fn movies(&self) -> &Chain<Movie> {
        &self.movies
    }

    /// First `n` movies of the active tab, as the home page highlights them
    #[must_use]
    pub fn featured(&self, n: usize) -> &[Movie] {
        let items = self.movies.items();
        &items[..n.min(items.len())]
    }
}

/// Catalog actions.
#[derive(Clone, Debug, PartialEq)]
pub enum CatalogAction {
    /// (Re)load the active tab
    Load,
    /// Switch tab
    SelectTab {
        /// Tab to show
        status: MovieStatus,
    },
    /// Movies arrived
    MoviesLoaded {
        /// Tag of the request this answers
        generation: Generation,
        /// Movies for the tab
        result: Result<Vec<Movie>, ApiError>,
    },
}

/// Reducer for the catalog.
#[derive(Clone, Copy, Debug, Default)]
pub struct CatalogReducer;

impl CatalogReducer {
    /// Create a new catalog reducer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn load(state: &mut CatalogState, env: &BookingEnvironment) -> Effects<CatalogAction> {
        let generation = state.movies.begin();
        let status = state.tab;
        let api = env.api();
        tracing::debug!(%status, %generation, "Fetching movies");

        smallvec![Effect::future(async move {
            let result = api.movies(status).await;
            Some(CatalogAction::MoviesLoaded { generation, result })
        })]
    }
}

impl Reducer for CatalogReducer {
    type State = CatalogState;
    type Action = CatalogAction;
    type Environment = BookingEnvironment;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Effects<Self::Action> {
        match action {
            CatalogAction::Load => Self::load(state, env),

            CatalogAction::SelectTab { status } => {
                if status == state.tab {
                    return smallvec![Effect::None];
                }
                state.tab = status;
                Self::load(state, env)
            },

            CatalogAction::MoviesLoaded { generation, result } => {
                if !state.movies.is_current(generation) {
                    tracing::debug!(%generation, "Dropping stale movies");
                    return smallvec![Effect::None];
                }
                match result {
                    Ok(movies) => state.movies.complete(movies),
                    Err(e) => {
                        tracing::warn!(error = %e, tab = %state.tab, "Failed to load movies");
                        state.movies.fail();
                    },
                }
                smallvec![Effect::None]
            },
        }
    }
}

/// Store running the catalog.
pub type CatalogStore = Store<CatalogState, CatalogAction, BookingEnvironment, CatalogReducer>;

/// Create a catalog store opened on the "now showing" tab.
#[must_use]
pub fn store(env: BookingEnvironment) -> CatalogStore {
    Store::new(CatalogState::default(), CatalogReducer::new(), env)
}
