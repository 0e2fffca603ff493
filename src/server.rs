//! MCP server exposing the site search engine as tools.

use crate::catalog::CatalogStore;
use crate::config::SearchConfig;
use crate::tools::resolve_link::{ResolveLinkRequest, handle_resolve_link};
use crate::tools::search::{SearchRequest, handle_search};
use rmcp::{
    ServerHandler,
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router,
};

/// MCP Server for site search queries
#[derive(Clone)]
pub struct SearchServer {
    /// Shared index cache; fetched once per process
    store: CatalogStore,

    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

impl std::fmt::Debug for SearchServer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchServer")
            .field("store", &self.store)
            .finish()
    }
}

#[tool_router]
impl SearchServer {
    pub fn new(store: CatalogStore) -> Self {
        Self {
            store,
            tool_router: Self::tool_router(),
        }
    }

    pub fn from_config(config: &SearchConfig) -> crate::error::Result<Self> {
        Ok(Self::new(CatalogStore::from_config(config)?))
    }

    /// Get a reference to the shared catalog store.
    pub const fn store(&self) -> &CatalogStore {
        &self.store
    }

    #[tool(
        description = "Search the site's services, locations, pages and blog posts. Every query word must match. Results are grouped by type, at most 8 per group. An empty query lists popular pages."
    )]
    async fn search(
        &self,
        Parameters(request): Parameters<SearchRequest>,
    ) -> std::result::Result<String, String> {
        Ok(handle_search(&self.store, request).await)
    }

    #[tool(
        description = "Classify a search result href as internal (client-side route, normalized path) or external (absolute URL, tel: or mailto:) and return the navigation target."
    )]
    async fn resolve_link(
        &self,
        Parameters(request): Parameters<ResolveLinkRequest>,
    ) -> std::result::Result<String, String> {
        Ok(handle_resolve_link(&request))
    }
}

#[tool_handler]
impl ServerHandler for SearchServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo::new(ServerCapabilities::builder().enable_tools().build())
            .with_protocol_version(ProtocolVersion::V_2024_11_05)
            .with_server_info(Implementation::from_build_env())
            .with_instructions(
                "site-search: site-wide search over the practice website's content index. \
                 Use search to find pages (an empty query returns popular pages) and \
                 resolve_link to see where a result navigates.",
            )
    }
}
