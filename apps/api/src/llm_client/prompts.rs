// Shared prompt fragments. Strategy templates live in `prompting`; this file
// only holds wording that every prompt must carry identically, so A/B runs
// across strategies compare like with like.

/// Persona line opening every question-answering prompt.
pub const ASSISTANT_PERSONA: &str = "Eres un asistente experto en el idioma guaraní.";

/// Persona line opening every transformation prompt.
pub const LINGUIST_PERSONA: &str =
    "Eres un lingüista experto en gramática guaraní que transforma oraciones siguiendo reglas exactas.";

/// Anti-hallucination instruction appended to transformation prompts.
pub const TRANSFORM_GUARD: &str = "\
- Aplica ÚNICAMENTE la regla indicada; no cambies el vocabulario ni el orden de las palabras.
- Si no estás seguro de la forma correcta, responde exactamente: NO SÉ
- NO inventes palabras ni morfemas.
- Responde con UNA sola línea que contenga solo la oración transformada, sin explicaciones.";

/// Anti-hallucination instruction appended to question prompts.
pub const QUESTION_GUARD: &str = "\
- Si no conoces la respuesta o la información no está disponible, indícalo claramente en lugar de inventarla.
- Responde de manera clara y educativa.
- Si es apropiado, incluye ejemplos en guaraní.";

/// Extra instruction used when a context block is present.
pub const CONTEXT_GROUNDING: &str =
    "- Basa tu respuesta en la información del contexto proporcionado; si no está en el contexto, indícalo.";
