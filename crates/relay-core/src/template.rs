//! # Template Renderer
//!
//! Literal placeholder substitution over the HTML contract template. There is
//! no template language: two tokens are replaced everywhere they occur and
//! every other byte is left untouched.
//!
//! Substitution runs in a single left-to-right pass over the template, so a
//! client value that happens to contain a placeholder token is inserted as
//! text and never expanded.

use crate::document::ContractDocument;
use crate::request::ContractRequest;

/// Replaced with the client name.
pub const NAME_PLACEHOLDER: &str = "{{NOME_CLIENTE}}";

/// Replaced with the unlock type.
pub const UNLOCK_TYPE_PLACEHOLDER: &str = "{{TIPO_DESBLOQUEIO}}";

/// Fixed location of the contract template. Relative, so it is resolved
/// against the process working directory at startup, not the binary's location.
pub const TEMPLATE_PATH: &str = "contract.html";

/// How caller-supplied values are embedded into the HTML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Escaping {
    /// Escape `& < > " '` before insertion.
    #[default]
    Html,
    /// Insert values verbatim. Callers must be trusted.
    Raw,
}

impl Escaping {
    fn apply(self, value: &str) -> String {
        match self {
            Self::Raw => value.to_string(),
            Self::Html => escape_html(value),
        }
    }
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

/// The loaded contract template source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractTemplate {
    source: String,
}

impl ContractTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Render the template for `request`.
    pub fn render(&self, request: &ContractRequest, escaping: Escaping) -> ContractDocument {
        let name = escaping.apply(request.client_name());
        let unlock_type = escaping.apply(request.unlock_type());
        let html = substitute(
            &self.source,
            &[
                (NAME_PLACEHOLDER, name.as_str()),
                (UNLOCK_TYPE_PLACEHOLDER, unlock_type.as_str()),
            ],
        );
        ContractDocument::new(request, html)
    }
}

/// Replace every occurrence of each token in one pass.
///
/// At each step the earliest token occurrence wins; text already emitted is
/// never scanned again.
fn substitute(source: &str, replacements: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    loop {
        let next = replacements
            .iter()
            .filter_map(|(token, value)| rest.find(token).map(|at| (at, *token, *value)))
            .min_by_key(|(at, _, _)| *at);

        match next {
            Some((at, token, value)) => {
                out.push_str(&rest[..at]);
                out.push_str(value);
                rest = &rest[at + token.len()..];
            }
            None => {
                out.push_str(rest);
                return out;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, kind: &str) -> ContractRequest {
        ContractRequest::new(name, "cliente@example.com", kind).unwrap()
    }

    #[test]
    fn replaces_both_placeholders() {
        let tpl = ContractTemplate::new("<p>{{NOME_CLIENTE}} / {{TIPO_DESBLOQUEIO}}</p>");
        let doc = tpl.render(&request("Ana Silva", "iCloud"), Escaping::Html);
        assert_eq!(doc.html(), "<p>Ana Silva / iCloud</p>");
    }

    #[test]
    fn replaces_every_occurrence() {
        let tpl = ContractTemplate::new(
            "{{NOME_CLIENTE}} contrata; assinado: {{NOME_CLIENTE}}. Tipo {{TIPO_DESBLOQUEIO}} ({{TIPO_DESBLOQUEIO}})",
        );
        let doc = tpl.render(&request("Bob", "FRP"), Escaping::Raw);
        assert_eq!(doc.html(), "Bob contrata; assinado: Bob. Tipo FRP (FRP)");
        assert!(!doc.html().contains("{{"));
    }

    #[test]
    fn surrounding_text_is_byte_identical() {
        let prefix = "<html>\n  <head><meta charset=\"utf-8\"></head>\n  <body>Cláusula 1ª: ";
        let middle = ": serviço de desbloqueio ";
        let suffix = "\n  </body>\n</html>\n";
        let tpl = ContractTemplate::new(format!(
            "{prefix}{NAME_PLACEHOLDER}{middle}{UNLOCK_TYPE_PLACEHOLDER}{suffix}"
        ));

        let doc = tpl.render(&request("Carla", "Samsung"), Escaping::Html);
        assert_eq!(doc.html(), format!("{prefix}Carla{middle}Samsung{suffix}"));
    }

    #[test]
    fn template_without_placeholders_is_unchanged() {
        let source = "<p>Sem marcadores {{OUTRO}} aqui</p>";
        let doc = ContractTemplate::new(source).render(&request("Dan", "X"), Escaping::Html);
        assert_eq!(doc.html(), source);
    }

    #[test]
    fn html_escaping_neutralizes_markup() {
        let tpl = ContractTemplate::new("<b>{{NOME_CLIENTE}}</b>");
        let doc = tpl.render(
            &request("<script>alert('x')</script> & \"co\"", "t"),
            Escaping::Html,
        );
        assert_eq!(
            doc.html(),
            "<b>&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt; &amp; &quot;co&quot;</b>"
        );
    }

    #[test]
    fn raw_escaping_inserts_verbatim() {
        let tpl = ContractTemplate::new("<b>{{NOME_CLIENTE}}</b>");
        let doc = tpl.render(&request("<i>Eve</i>", "t"), Escaping::Raw);
        assert_eq!(doc.html(), "<b><i>Eve</i></b>");
    }

    #[test]
    fn document_name_is_not_html_escaped() {
        let tpl = ContractTemplate::new("{{NOME_CLIENTE}}");
        let doc = tpl.render(&request("Zé & Filhos", "t"), Escaping::Html);
        assert_eq!(doc.html(), "Zé &amp; Filhos");
        assert_eq!(doc.name(), "Contrato de Desbloqueio - Zé & Filhos");
    }

    #[test]
    fn value_containing_a_token_is_not_re_expanded() {
        let tpl = ContractTemplate::new("{{NOME_CLIENTE}}|{{TIPO_DESBLOQUEIO}}");
        let doc = tpl.render(&request("{{TIPO_DESBLOQUEIO}}", "FRP"), Escaping::Raw);
        assert_eq!(doc.html(), "{{TIPO_DESBLOQUEIO}}|FRP");
    }

    #[test]
    fn adjacent_placeholders() {
        let tpl = ContractTemplate::new("{{TIPO_DESBLOQUEIO}}{{NOME_CLIENTE}}{{TIPO_DESBLOQUEIO}}");
        let doc = tpl.render(&request("N", "T"), Escaping::Raw);
        assert_eq!(doc.html(), "TNT");
    }
}
