//! Language Server Protocol implementation for pseudocode.
//!
//! This module provides an LSP server exposing the editor affordances:
//! - Semantic highlighting from the tokenizer
//! - Folding ranges from the block-structure matcher
//! - Auto-indent after `DO` via on-type formatting
//! - Hover showing the token category
//! - Warnings for malformed identifiers
//!
//! # Architecture
//!
//! The LSP server uses `tower-lsp` and communicates via JSON-RPC over stdio.
//! It keeps the text of open documents (full sync) and recomputes every
//! answer from it; nothing is cached between requests.
//!
//! ```text
//! Editor (VSCode, etc.)
//!     ↓ JSON-RPC over stdio
//! PseudocodeLanguageServer
//!     ↓ Uses
//! lexer, editor
//! ```

use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::RwLock;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::*;
use tower_lsp::{Client, LanguageServer, LspService, Server};

use crate::editor::EditorConfig;
use crate::lexer::{lex, token_at, TokenKind};

/// Diagnostic source name.
const SOURCE: &str = "pseudocode";

/// State for a single open document.
#[derive(Debug)]
pub struct DocumentState {
    /// The document's content.
    pub content: String,
    /// The document's version.
    pub version: i32,
}

/// Shared state for the language server.
#[derive(Debug, Default)]
pub struct ServerState {
    /// Open documents indexed by URI.
    pub documents: HashMap<Url, DocumentState>,
    /// Editor settings from the client's initialization options.
    pub config: EditorConfig,
}

/// The pseudocode language server.
pub struct PseudocodeLanguageServer {
    /// Client handle for sending notifications.
    client: Client,
    /// Shared server state.
    state: Arc<RwLock<ServerState>>,
}

impl PseudocodeLanguageServer {
    /// Creates a new language server instance.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            state: Arc::new(RwLock::new(ServerState::default())),
        }
    }

    /// Publishes diagnostics for a document.
    async fn analyze_document(&self, uri: &Url, content: &str, version: i32) {
        let diagnostics = get_diagnostics(content);
        self.client
            .publish_diagnostics(uri.clone(), diagnostics, Some(version))
            .await;
    }

    /// Current content of an open document, with the editor settings.
    async fn document(&self, uri: &Url) -> Option<(String, EditorConfig)> {
        let state = self.state.read().await;
        state
            .documents
            .get(uri)
            .map(|d| (d.content.clone(), state.config.clone()))
    }
}

/// Runs a language server over `input`/`output` until the client exits.
pub async fn serve<I, O>(input: I, output: O)
where
    I: AsyncRead + Unpin,
    O: AsyncWrite + Unpin,
{
    let (service, socket) = LspService::new(PseudocodeLanguageServer::new);
    Server::new(input, output, socket).serve(service).await;
}

/// Runs a language server on stdin/stdout.
///
/// Logging must not go to stdout, which carries the protocol.
pub async fn serve_stdio() {
    log::info!(
        "Starting pseudocode LSP server v{}",
        env!("CARGO_PKG_VERSION")
    );
    serve(tokio::io::stdin(), tokio::io::stdout()).await;
}

#[tower_lsp::async_trait]
impl LanguageServer for PseudocodeLanguageServer {
    async fn initialize(&self, params: InitializeParams) -> Result<InitializeResult> {
        let config = editor_config(params.initialization_options);
        log::info!("Editor config: {config:?}");
        self.state.write().await.config = config;

        Ok(InitializeResult {
            capabilities: ServerCapabilities {
                // Document sync - full content on each change
                text_document_sync: Some(TextDocumentSyncCapability::Kind(
                    TextDocumentSyncKind::FULL,
                )),
                hover_provider: Some(HoverProviderCapability::Simple(true)),
                semantic_tokens_provider: Some(
                    SemanticTokensServerCapabilities::SemanticTokensOptions(
                        SemanticTokensOptions {
                            legend: legend(),
                            full: Some(SemanticTokensFullOptions::Bool(true)),
                            range: None,
                            work_done_progress_options: Default::default(),
                        },
                    ),
                ),
                folding_range_provider: Some(FoldingRangeProviderCapability::Simple(true)),
                document_on_type_formatting_provider: Some(DocumentOnTypeFormattingOptions {
                    first_trigger_character: "\n".to_string(),
                    more_trigger_character: None,
                }),
                ..Default::default()
            },
            server_info: Some(ServerInfo {
                name: "pseudocode-lsp".to_string(),
                version: Some(env!("CARGO_PKG_VERSION").to_string()),
            }),
        })
    }

    async fn initialized(&self, _: InitializedParams) {
        self.client
            .log_message(MessageType::INFO, "Pseudocode LSP server initialized")
            .await;
    }

    async fn shutdown(&self) -> Result<()> {
        Ok(())
    }

    async fn did_open(&self, params: DidOpenTextDocumentParams) {
        let uri = params.text_document.uri;
        let content = params.text_document.text;
        let version = params.text_document.version;

        {
            let mut state = self.state.write().await;
            state.documents.insert(
                uri.clone(),
                DocumentState {
                    content: content.clone(),
                    version,
                },
            );
        }

        self.analyze_document(&uri, &content, version).await;
    }

    async fn did_change(&self, params: DidChangeTextDocumentParams) {
        let uri = params.text_document.uri;
        let version = params.text_document.version;

        // FULL sync: one change carrying the whole text
        if let Some(change) = params.content_changes.into_iter().next() {
            let content = change.text;

            {
                let mut state = self.state.write().await;
                if let Some(doc) = state.documents.get_mut(&uri) {
                    doc.content = content.clone();
                    doc.version = version;
                }
            }

            self.analyze_document(&uri, &content, version).await;
        }
    }

    async fn did_close(&self, params: DidCloseTextDocumentParams) {
        let uri = params.text_document.uri;

        {
            let mut state = self.state.write().await;
            state.documents.remove(&uri);
        }

        // Clear diagnostics
        self.client.publish_diagnostics(uri, vec![], None).await;
    }

    async fn semantic_tokens_full(
        &self,
        params: SemanticTokensParams,
    ) -> Result<Option<SemanticTokensResult>> {
        let Some((content, _)) = self.document(&params.text_document.uri).await else {
            return Ok(None);
        };
        Ok(Some(SemanticTokensResult::Tokens(SemanticTokens {
            result_id: None,
            data: semantic_tokens(&content),
        })))
    }

    async fn folding_range(&self, params: FoldingRangeParams) -> Result<Option<Vec<FoldingRange>>> {
        let Some((content, config)) = self.document(&params.text_document.uri).await else {
            return Ok(None);
        };
        Ok(Some(folding_ranges(&content, &config)))
    }

    async fn on_type_formatting(
        &self,
        params: DocumentOnTypeFormattingParams,
    ) -> Result<Option<Vec<TextEdit>>> {
        let position = params.text_document_position;
        let Some((content, config)) = self.document(&position.text_document.uri).await else {
            return Ok(None);
        };
        if params.ch != "\n" {
            return Ok(None);
        }
        Ok(newline_edits(&content, position.position, &config))
    }

    async fn hover(&self, params: HoverParams) -> Result<Option<Hover>> {
        let uri = &params.text_document_position_params.text_document.uri;
        let position = params.text_document_position_params.position;

        let Some((content, _)) = self.document(uri).await else {
            return Ok(None);
        };

        Ok(get_hover_info(&content, position).map(|info| Hover {
            contents: HoverContents::Markup(MarkupContent {
                kind: MarkupKind::Markdown,
                value: info,
            }),
            range: None,
        }))
    }
}

/// Reads the editor settings from initialization options, falling back to
/// defaults when they are absent or malformed.
fn editor_config(options: Option<Value>) -> EditorConfig {
    match options {
        None | Some(Value::Null) => EditorConfig::default(),
        Some(raw) => serde_json::from_value(raw).unwrap_or_else(|err| {
            log::warn!("Ignoring invalid initialization options: {err}");
            EditorConfig::default()
        }),
    }
}

/// Custom semantic token type for malformed identifiers.
const INVALID_TOKEN_TYPE: &str = "invalid";

/// The semantic token legend, indexed by [`token_type_index`].
fn legend() -> SemanticTokensLegend {
    SemanticTokensLegend {
        token_types: vec![
            SemanticTokenType::KEYWORD,
            SemanticTokenType::ENUM_MEMBER,
            SemanticTokenType::NUMBER,
            SemanticTokenType::STRING,
            SemanticTokenType::COMMENT,
            SemanticTokenType::OPERATOR,
            SemanticTokenType::VARIABLE,
            SemanticTokenType::new(INVALID_TOKEN_TYPE),
        ],
        token_modifiers: vec![],
    }
}

fn token_type_index(kind: TokenKind) -> u32 {
    match kind {
        TokenKind::Keyword => 0,
        TokenKind::Boolean => 1,
        TokenKind::Number => 2,
        TokenKind::String => 3,
        TokenKind::Comment => 4,
        TokenKind::Operator => 5,
        TokenKind::Identifier => 6,
        TokenKind::Invalid => 7,
    }
}

/// Encodes the tokenizer output in the LSP relative format.
fn semantic_tokens(source: &str) -> Vec<SemanticToken> {
    let mut data = Vec::new();
    let (mut line, mut character) = (0u32, 0u32);
    let (mut prev_line, mut prev_start) = (0u32, 0u32);
    let mut pos = 0usize;

    for token in lex(source) {
        for c in source[pos..token.start()].chars() {
            if c == '\n' {
                line += 1;
                character = 0;
            } else {
                character += 1;
            }
        }
        pos = token.start();

        let delta_line = line - prev_line;
        let delta_start = if delta_line == 0 {
            character - prev_start
        } else {
            character
        };
        data.push(SemanticToken {
            delta_line,
            delta_start,
            length: token.text.chars().count() as u32,
            token_type: token_type_index(token.kind),
            token_modifiers_bitset: 0,
        });
        prev_line = line;
        prev_start = character;
    }

    data
}

/// Fold ranges as whole-line LSP ranges.
fn folding_ranges(source: &str, config: &EditorConfig) -> Vec<FoldingRange> {
    config
        .fold_ranges(source)
        .into_iter()
        .map(|fold| FoldingRange {
            start_line: offset_to_position(source, fold.from).line,
            end_line: offset_to_position(source, fold.to).line,
            kind: Some(FoldingRangeKind::Region),
            ..Default::default()
        })
        .collect()
}

/// Indentation edit for a newline the client has just inserted.
///
/// `position` is where the cursor landed, at the start of the new line.
/// The auto-indent rule is evaluated at the end of the previous line and
/// any indentation the client already added is replaced.
fn newline_edits(source: &str, position: Position, config: &EditorConfig) -> Option<Vec<TextEdit>> {
    let offset = position_to_offset(source, position)?;
    let line_start = source[..offset].rfind('\n')? + 1;
    let newline = line_start - 1;
    let line_end = if source[..newline].ends_with('\r') {
        newline - 1
    } else {
        newline
    };

    let edit = config.auto_indent(source, line_end)?;
    let indent = edit.insert.trim_start_matches('\n');

    let rest = &source[line_start..];
    let existing = rest.len() - rest.trim_start_matches(|c| c == ' ' || c == '\t').len();

    Some(vec![TextEdit {
        range: span_to_range(source, line_start, line_start + existing),
        new_text: indent.to_string(),
    }])
}

/// One warning per malformed identifier.
fn get_diagnostics(source: &str) -> Vec<Diagnostic> {
    lex(source)
        .into_iter()
        .filter(|token| token.kind == TokenKind::Invalid)
        .map(|token| Diagnostic {
            range: span_to_range(source, token.start(), token.end()),
            severity: Some(DiagnosticSeverity::WARNING),
            source: Some(SOURCE.to_string()),
            message: format!("invalid identifier `{}`", token.text),
            ..Default::default()
        })
        .collect()
}

/// Gets hover information at a position.
fn get_hover_info(source: &str, position: Position) -> Option<String> {
    let offset = position_to_offset(source, position)?;
    let token = token_at(source, offset)?;
    let mut info = format!("**{}** `{}`", token.kind, token.text);
    if token.kind == TokenKind::Invalid {
        info.push_str("\n\nIdentifiers start with a letter or `_` and contain only ASCII letters, digits and `_`.");
    }
    Some(info)
}

/// Converts a byte range to an LSP Range.
fn span_to_range(source: &str, start: usize, end: usize) -> Range {
    let start_pos = offset_to_position(source, start);
    let end_pos = offset_to_position(source, end);
    Range {
        start: start_pos,
        end: end_pos,
    }
}

/// Converts a byte offset to an LSP Position (line, character).
fn offset_to_position(source: &str, offset: usize) -> Position {
    let mut line = 0u32;
    let mut character = 0u32;

    for (i, c) in source.char_indices() {
        if i >= offset {
            break;
        }
        if c == '\n' {
            line += 1;
            character = 0;
        } else {
            character += 1;
        }
    }

    Position { line, character }
}

/// Converts an LSP Position to a byte offset.
fn position_to_offset(source: &str, position: Position) -> Option<usize> {
    let mut current_line = 0u32;
    let mut current_char = 0u32;

    for (i, c) in source.char_indices() {
        if current_line == position.line && current_char == position.character {
            return Some(i);
        }
        if c == '\n' {
            if current_line == position.line {
                // Position is past end of line
                return Some(i);
            }
            current_line += 1;
            current_char = 0;
        } else {
            current_char += 1;
        }
    }

    // Position might be at the very end
    if current_line == position.line {
        Some(source.len())
    } else {
        None
    }
}
