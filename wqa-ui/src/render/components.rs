//! One HTML fragment per view state

use wqa_common::AnalysisResult;

use super::escape_html;
use super::severity::{axis_icon, level_style};
use crate::session::PreviewRef;

pub const ACCEPTED_INPUT_TYPES: &str = "image/*,.jpeg,.jpg,.png,.webp";

pub fn splash() -> String {
    r#"<section class="view view-initializing">
    <div class="splash">
        <div class="drop-mark breathe">💧</div>
        <h2 class="title-gradient">Analisador Visual de Água</h2>
        <p class="muted">Inicializando sistema de IA...</p>
    </div>
</section>"#
        .to_string()
}

/// Upload surface; the file input itself lives in the page chrome
pub fn uploader() -> String {
    r#"<section class="view view-idle">
    <div id="drop-zone" class="drop-zone" role="button" tabindex="0">
        <div class="upload-mark">⇪</div>
        <h2>Arraste e solte uma imagem aqui</h2>
        <p class="muted">ou</p>
        <span class="button">Selecione um Arquivo</span>
        <p class="tip">Tire uma foto nítida de um copo ou amostra de água contra um fundo neutro para melhores resultados.</p>
    </div>
</section>"#
        .to_string()
}

pub fn analyzing(preview: &PreviewRef) -> String {
    format!(
        r#"<section class="view view-analyzing">
    <img class="preview" src="{url}" alt="Amostra de água">
    <div class="spinner" aria-label="Carregando"></div>
    <p class="lead">Analisando a imagem... Por favor, aguarde.</p>
    <p class="muted small">A IA está processando os detalhes visuais.</p>
</section>"#,
        url = preview.url()
    )
}

pub fn result(result: &AnalysisResult, preview: &PreviewRef) -> String {
    let cards: String = result
        .readings()
        .iter()
        .map(|reading| {
            let style = level_style(reading.severity);
            format!(
                r#"
            <article class="card card-{class}" data-axis="{key}">
                <h4><span class="axis-icon">{axis_icon}</span>{title}</h4>
                <p class="level level-{class}"><span class="level-icon">{level_icon}</span>{level}</p>
                <p class="description">{description}</p>
            </article>"#,
                class = style.class,
                key = reading.axis.key(),
                axis_icon = axis_icon(reading.axis),
                title = reading.axis.title(),
                level_icon = style.icon,
                level = reading.level,
                description = escape_html(reading.description),
            )
        })
        .collect();

    format!(
        r#"<section class="view view-result">
    <div class="result-grid">
        <div class="sample-column">
            <h3>Sua Amostra</h3>
            <img class="sample" src="{url}" alt="Amostra de água analisada">
        </div>
        <div class="findings-column">
            <h3>Resultado da Análise Visual</h3>
            <blockquote class="summary">
                <h4>Sumário da IA</h4>
                <p>{summary}</p>
            </blockquote>
            <div class="cards">{cards}
            </div>
        </div>
    </div>
    <div class="actions">
        <button type="button" class="button" data-action="reset">Analisar Outra Amostra</button>
    </div>
</section>"#,
        url = preview.url(),
        summary = escape_html(result.summary()),
        cards = cards,
    )
}

pub fn error(message: &str) -> String {
    format!(
        r#"<section class="view view-error">
    <div class="error-panel">
        <div class="error-mark">!</div>
        <h3>Ocorreu um Erro</h3>
        <p class="error-message">{message}</p>
        <button type="button" class="button button-danger" data-action="reset">Tentar Novamente</button>
    </div>
</section>"#,
        message = escape_html(message)
    )
}
