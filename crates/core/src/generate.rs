//! Note generation pipeline: fetch template, render, rewrite heading, then
//! either hand the result back (dry run) or create the note.

use thiserror::Error;
use tracing::{debug, info};

use crate::store::{NoteStore, StoreError};
use crate::templates::{
    HeadingAction, RenderScope, TemplateRenderError, render, rewrite_heading,
};
use crate::vars::{DateFormatter, VarsMap};

/// Everything one invocation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteRequest {
    /// Identifier of the template note.
    pub template: String,
    /// Filename of the note to create.
    pub note: String,
    /// Invocation date, also the base of the `format` helper.
    pub date: String,
    pub title: Option<String>,
    pub remove_title: bool,
    pub dry_run: bool,
    /// Extra variables from unrecognised `--name value` options.
    pub vars: VarsMap,
}

impl NoteRequest {
    pub fn new(
        template: impl Into<String>,
        note: impl Into<String>,
        date: impl Into<String>,
    ) -> Self {
        Self {
            template: template.into(),
            note: note.into(),
            date: date.into(),
            title: None,
            remove_title: true,
            dry_run: false,
            vars: VarsMap::new(),
        }
    }

    /// Extra variables plus the known parameters, with the date helper.
    ///
    /// Known parameters are bound last so an extra variable cannot shadow them.
    pub fn render_scope(&self) -> RenderScope {
        let mut scope = RenderScope::new(DateFormatter::new(self.date.as_str()));
        scope.extend(self.vars.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        scope.insert("template", self.template.as_str());
        scope.insert("note", self.note.as_str());
        scope.insert("date", self.date.as_str());
        if let Some(ref title) = self.title {
            scope.insert("title", title.as_str());
        }
        scope.insert("removeTitle", self.remove_title.to_string());
        scope.insert("dryRun", self.dry_run.to_string());
        scope
    }

    pub fn heading_action(&self) -> HeadingAction<'_> {
        HeadingAction::from_options(self.title.as_deref(), self.remove_title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Generated {
    /// Rendered but not written.
    DryRun { content: String },
    Committed { note: String, content: String },
}

impl Generated {
    pub fn content(&self) -> &str {
        match self {
            Self::DryRun { content } | Self::Committed { content, .. } => content,
        }
    }
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("failed to render template '{template}': {source}")]
    Render {
        template: String,
        #[source]
        source: TemplateRenderError,
    },
}

/// Render `template_text` for `request` and apply the heading rewrite.
pub fn assemble(
    template_text: &str,
    request: &NoteRequest,
) -> Result<String, TemplateRenderError> {
    let scope = request.render_scope();
    debug!("render scope: {:?}", scope.names().collect::<Vec<_>>());
    let rendered = render(template_text, &scope)?;
    Ok(rewrite_heading(&rendered, request.heading_action()))
}

/// Run the whole pipeline against `store`.
///
/// The note is only written when rendering succeeded and `dry_run` is off.
pub fn generate<S: NoteStore>(
    store: &S,
    request: &NoteRequest,
) -> Result<Generated, GenerateError> {
    info!("fetching template '{}'", request.template);
    let template_text = store.read_template(&request.template)?;

    let content = assemble(&template_text, request).map_err(|source| {
        GenerateError::Render { template: request.template.clone(), source }
    })?;

    if request.dry_run {
        info!("dry run, not creating '{}'", request.note);
        return Ok(Generated::DryRun { content });
    }

    info!("creating note '{}'", request.note);
    store.write_note(&request.note, &content)?;
    Ok(Generated::Committed { note: request.note.clone(), content })
}
