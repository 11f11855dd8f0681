use super::{Stage, SvgDocument};
use crate::error::Result;

/// Sets the root `width` and `height` to the same pixel size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resize {
    pub size: u32,
}

impl Stage for Resize {
    fn name(&self) -> &'static str {
        "resize"
    }

    fn apply(&self, doc: &mut SvgDocument) -> Result<()> {
        let size = self.size.to_string();
        doc.root.set_attr("width", size.as_str());
        doc.root.set_attr("height", size);
        Ok(())
    }
}
