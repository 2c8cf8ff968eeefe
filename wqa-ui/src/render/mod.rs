//! Presentation layer
//!
//! Pure functions from the current [`ViewState`] to HTML. Nothing here holds
//! state; drag-hover highlighting is handled in the browser and never reaches
//! the view state.

mod assets;
pub mod components;
pub mod severity;

use crate::session::ViewState;
use crate::BuildInfo;

/// Fragment for the current state (what `#view` contains)
pub fn view(state: &ViewState) -> String {
    match state {
        ViewState::Initializing => components::splash(),
        ViewState::Idle => components::uploader(),
        ViewState::Analyzing { preview } => components::analyzing(preview),
        ViewState::Result { result, preview } => components::result(result, preview),
        ViewState::Error { message } => components::error(message),
    }
}

/// Full page: chrome around the current view. The chrome stays hidden while
/// the splash is showing.
pub fn page(state: &ViewState, build: &BuildInfo) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Analisador Visual de Água</title>
    <style>{style}</style>
</head>
<body{body_class}>
    <header>
        <div class="header-content">
            <div class="header-left">
                <h1>💧 Analisador Visual de Água</h1>
                <p class="subtitle">BETA EXPERIMENTAL<span id="connection-status" class="connection-status status-connecting">Conectando</span></p>
            </div>
            <div class="header-right">
                <div class="build-info-line">v{version} [{git_hash}]</div>
                <div class="build-info-line">{profile} {built_at}</div>
            </div>
        </div>
    </header>
    <main>
        <div id="view">{view}</div>
    </main>
    <input type="file" id="file-input" accept="{accept}" hidden>
    <footer>
        <p>Aviso: Esta é uma ferramenta experimental. A análise é uma estimativa visual e não substitui testes laboratoriais profissionais.</p>
    </footer>
    <script>{script}</script>
</body>
</html>
"#,
        style = assets::STYLE,
        body_class = if matches!(state, ViewState::Initializing) {
            r#" class="splash-active""#
        } else {
            ""
        },
        version = build.version,
        git_hash = build.git_hash,
        profile = build.profile,
        built_at = build.built_at,
        view = view(state),
        accept = components::ACCEPTED_INPUT_TYPES,
        script = assets::SCRIPT,
    )
}

/// Escape text for inclusion in HTML element content or quoted attributes
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{ImageSample, PreviewRegistry};
    use wqa_common::{AnalysisDetail, AnalysisResult, ColorLevel, Level};

    fn preview() -> crate::session::PreviewRef {
        let sample = ImageSample::from_upload(vec![0xFFu8, 0xD8, 0xFF], Some("image/jpeg")).unwrap();
        PreviewRegistry::new().create(&sample)
    }

    fn result(turbidity: Level, color: ColorLevel, summary: &str) -> AnalysisResult {
        AnalysisResult::new(
            AnalysisDetail::new(turbidity, "Turbidez observada"),
            AnalysisDetail::new(Level::Low, "Sem algas"),
            AnalysisDetail::new(color, "Cor observada"),
            AnalysisDetail::new(Level::Low, "Sem resíduos"),
            summary,
        )
    }

    #[test]
    fn test_clear_water_renders_four_favorable_cards() {
        let summary = "A amostra aparenta estar limpa e transparente.";
        let state = ViewState::Result {
            result: result(Level::Low, ColorLevel::Normal, summary),
            preview: preview(),
        };
        let html = view(&state);
        assert_eq!(html.matches("card card-favorable").count(), 4);
        assert!(!html.contains("card-cautionary"));
        assert!(!html.contains("card-severe"));
        assert!(html.contains(summary));
        assert!(html.contains("Analisar Outra Amostra"));
    }

    #[test]
    fn test_severity_tiers_render_distinctly() {
        let state = ViewState::Result {
            result: result(Level::High, ColorLevel::Medium, "Água turva."),
            preview: preview(),
        };
        let html = view(&state);
        assert!(html.contains(r#"card card-severe" data-axis="turbidez""#));
        assert!(html.contains(r#"card card-cautionary" data-axis="cor""#));
        assert_eq!(html.matches("card card-favorable").count(), 2);
    }

    #[test]
    fn test_provider_text_is_escaped() {
        let state = ViewState::Result {
            result: result(Level::Low, ColorLevel::Normal, "<script>alert('x')</script>"),
            preview: preview(),
        };
        let html = view(&state);
        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }

    #[test]
    fn test_each_state_has_its_view() {
        let preview = preview();
        assert!(view(&ViewState::Initializing).contains("Inicializando sistema de IA"));
        assert!(view(&ViewState::Idle).contains(r#"id="drop-zone""#));

        let analyzing = view(&ViewState::Analyzing {
            preview: preview.clone(),
        });
        assert!(analyzing.contains(&preview.url()));
        assert!(analyzing.contains("spinner"));

        let error = view(&ViewState::Error {
            message: "Falha na análise. A API retornou uma resposta vazia.".to_string(),
        });
        assert!(error.contains("Ocorreu um Erro"));
        assert!(error.contains("resposta vazia"));
        assert!(error.contains(r#"data-action="reset""#));
    }

    #[test]
    fn test_page_wraps_view_in_chrome() {
        let html = page(&ViewState::Idle, &BuildInfo::current());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("BETA EXPERIMENTAL"));
        assert!(html.contains(r#"accept="image/*,.jpeg,.jpg,.png,.webp""#));
        assert!(html.contains("new EventSource('/events')"));
        assert!(html.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_splash_page_hides_chrome() {
        let build = BuildInfo::current();

        let splash = page(&ViewState::Initializing, &build);
        assert!(splash.contains(r#"<body class="splash-active">"#));
        assert!(splash.contains("Inicializando sistema de IA"));

        let idle = page(&ViewState::Idle, &build);
        assert!(idle.contains("<body>"));
        assert!(!idle.contains(r#"class="splash-active""#));
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html(r#"a & "b" <c>"#), "a &amp; &quot;b&quot; &lt;c&gt;");
        assert_eq!(escape_html("água"), "água");
    }
}
