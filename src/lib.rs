pub mod app;
pub mod config;
pub mod error;
pub mod models {
    pub mod share_link;
}
pub mod rendering {
    pub mod prune;
}
pub mod figma {
    pub mod client;
}
pub mod api {
    pub mod errors;
    pub mod figma_node;
}
