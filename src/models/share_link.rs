use thiserror::Error;
use url::Url;

/// Query parameter carrying the node locator in a share link.
const NODE_ID_PARAM: &str = "node-id";

/// A resolved reference to a single node inside a Figma file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    /// The file key (third path segment of the share link).
    pub document_id: String,
    /// The node id in the colon form the Figma API expects (e.g. `1:2`).
    pub node_id: String,
}

/// The share link could not be resolved to a [`Locator`].
///
/// Malformed URLs and missing components are deliberately indistinguishable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Invalid Figma link format")]
pub struct InvalidLink;

impl Locator {
    /// Resolve a share link such as
    /// `https://www.figma.com/file/ABC123/Title?node-id=1-2`.
    ///
    /// The document id is the third `/`-separated path component and the node
    /// id is the `node-id` query parameter with every `-` replaced by `:`.
    pub fn from_share_link(link: &str) -> Result<Self, InvalidLink> {
        let url = Url::parse(link).map_err(|e| {
            tracing::debug!("Share link '{link}' is not a valid URL: {e}");
            InvalidLink
        })?;

        let document_id = url
            .path()
            .split('/')
            .nth(2)
            .filter(|segment| !segment.is_empty())
            .ok_or(InvalidLink)?
            .to_string();

        let node_param = url
            .query_pairs()
            .find(|(key, _)| key == NODE_ID_PARAM)
            .map(|(_, value)| value.into_owned())
            .filter(|value| !value.is_empty())
            .ok_or(InvalidLink)?;

        Ok(Self {
            document_id,
            node_id: node_param.replace('-', ":"),
        })
    }
}
