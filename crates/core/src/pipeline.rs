//! Compose + resolve for one theme: layers -> [`TokenTable`].
//!
//! This is a thin orchestrator over the pass modules. The build crate calls
//! the passes individually so it can attribute failures to a stage.

use crate::ast::TokenTable;
use crate::error::TokenError;
use crate::pass1_load::Layer;
use crate::pass2_compose;
use crate::pass3_resolve;
use crate::theme::ThemeDescriptor;

/// Resolve `theme` against the loaded layers.
pub fn resolve_theme(theme: &ThemeDescriptor, layers: &[Layer]) -> Result<TokenTable, TokenError> {
    let ordered = pass2_compose::compose(theme, layers)?;
    pass3_resolve::resolve(&ordered, &theme.mode_selection)
}
