// Wording for the strategy skeleton in `prompting::assemble`.
// Cross-cutting persona and guard text lives in `llm_client::prompts`.

/// Literal placed in the context slot when retrieval returned nothing.
pub const NO_CONTEXT_MARKER: &str = "(sin contexto)";

pub const QUESTION_CONTEXT_INTRO: &str =
    "Usa la siguiente información de referencia para responder la pregunta.";
pub const TRANSFORM_CONTEXT_INTRO: &str =
    "Consulta la siguiente referencia gramatical antes de transformar la oración.";

pub const QUESTION_CONTEXT_HEADING: &str = "CONTEXTO:";
pub const TRANSFORM_CONTEXT_HEADING: &str = "CONTEXTO GRAMATICAL:";
pub const EXAMPLES_HEADING: &str = "EJEMPLOS:";
pub const INSTRUCTIONS_HEADING: &str = "INSTRUCCIONES:";

pub const QUESTION_LABEL: &str = "PREGUNTA:";
pub const RULE_LABEL: &str = "REGLA:";
pub const SENTENCE_LABEL: &str = "ORACIÓN:";

pub const QUESTION_ANSWER_LABEL: &str = "RESPUESTA:";
pub const TRANSFORM_ANSWER_LABEL: &str = "RESULTADO:";

/// Worked question/answer pairs for few-shot question answering.
pub const QUESTION_EXAMPLES: &[(&str, &str)] = &[
    (
        "¿Cómo se dice \"hola\" en guaraní?",
        "Se dice \"Mba'éichapa\" (¿cómo estás?) o simplemente \"Maitei\" como saludo.",
    ),
    (
        "¿Cuál es el pronombre personal de primera persona singular?",
        "Es \"che\" (yo). Por ejemplo: \"Che ajapo\" significa \"yo hago\".",
    ),
    (
        "¿Qué diferencia hay entre \"ñande\" y \"ore\"?",
        "Ambos significan \"nosotros\": \"ñande\" incluye al oyente y \"ore\" lo excluye.",
    ),
];
