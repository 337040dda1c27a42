use std::sync::LazyLock;

use evalexpr::EvalexprResult;
use regex::Regex;
use tracing::debug;
use crate::types::{AnswerKind, MathAnswer};

pub const EMPTY_QUESTION_REPLY: &str = "Por favor, digite uma pergunta matemática.";
pub const NOT_UNDERSTOOD_REPLY: &str =
    "Desculpe, não consegui entender a pergunta. Tente algo como \"Quanto é 2 + 2?\" ou \"Qual é o resultado do texto?\"";

const QUESTION_KEYWORDS: [&str; 2] = ["quanto é", "qual é"];
const TEXT_KEYWORDS: [&str; 2] = ["texto", "imagem"];

static BARE_EXPRESSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+[+\-*/][0-9]+$").expect("valid regex"));
static EMBEDDED_EXPRESSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+\s*[+\-*/]\s*[0-9]+").expect("valid regex"));
static TEXT_EXPRESSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+\s*[+\-*/]\s*[0-9]+\s*=?\s*").expect("valid regex"));
static INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid regex"));

fn strip_whitespace(value: &str) -> String {
    value.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Evaluate a single `a op b` expression with floating point division
pub fn evaluate_expression(expression: &str) -> EvalexprResult<f64> {
    let floats = INTEGER.replace_all(expression, "${0}.0");
    evalexpr::eval_float(&floats)
}

/// Render a number the way a browser prints it: `4`, `3.5`, `Infinity`, `1e+21`
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let magnitude = value.abs();
    if magnitude >= 1e21 || (magnitude > 0.0 && magnitude < 1e-6) {
        let formatted = format!("{:e}", value);
        return match formatted.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => formatted,
        };
    }

    format!("{}", value)
}

/// Route a free-form question to an arithmetic answer.
///
/// Rules are tried in order: the whole question as `a op b`, an expression
/// inside a "quanto é"/"qual é" question, then the first expression of
/// `extracted_text` when the question mentions "texto" or "imagem".
pub fn answer_question(question: &str, extracted_text: &str) -> MathAnswer {
    let question = question.trim();
    if question.is_empty() {
        return reply(AnswerKind::Empty, None, None, EMPTY_QUESTION_REPLY.to_string());
    }

    let answer = route(question, extracted_text).unwrap_or_else(|err| {
        reply(AnswerKind::Error, None, None, format!("Erro ao calcular: {}", err))
    });
    debug!(kind = ?answer.kind, expression = ?answer.expression, "answered question");
    answer
}

fn route(question: &str, extracted_text: &str) -> EvalexprResult<MathAnswer> {
    let compact = strip_whitespace(question);
    if BARE_EXPRESSION.is_match(&compact) {
        let value = evaluate_expression(&compact)?;
        // 0/0 falls through to the keyword rules
        if !value.is_nan() {
            return Ok(resolved(AnswerKind::Expression, compact, value));
        }
    }

    let lower = question.to_lowercase();

    if QUESTION_KEYWORDS.iter().any(|keyword| lower.contains(keyword)) {
        if let Some(found) = EMBEDDED_EXPRESSION.find(question) {
            let expression = strip_whitespace(found.as_str());
            let value = evaluate_expression(&expression)?;
            return Ok(resolved(AnswerKind::Question, expression, value));
        }
    }

    if TEXT_KEYWORDS.iter().any(|keyword| lower.contains(keyword)) {
        if let Some(found) = TEXT_EXPRESSION.find(extracted_text) {
            let compact = strip_whitespace(found.as_str());
            let expression = compact.strip_suffix('=').unwrap_or(&compact).to_string();
            let value = evaluate_expression(&expression)?;
            return Ok(resolved(AnswerKind::ExtractedText, expression, value));
        }
    }

    Ok(reply(AnswerKind::NotUnderstood, None, None, NOT_UNDERSTOOD_REPLY.to_string()))
}

fn resolved(kind: AnswerKind, expression: String, value: f64) -> MathAnswer {
    let prefix = match kind {
        AnswerKind::ExtractedText => "No texto extraído",
        _ => "Resultado",
    };
    let message = format!("{}: {} = {}", prefix, expression, format_number(value));
    reply(kind, Some(expression), Some(value), message)
}

fn reply(kind: AnswerKind, expression: Option<String>, value: Option<f64>, message: String) -> MathAnswer {
    MathAnswer { kind, expression, value, message }
}
