// User-facing chat text. Kept in Spanish, like the rest of the shell.

pub const RAG_ON_REPLY: &str = "✅ Modo RAG activado";
pub const RAG_OFF_REPLY: &str = "✅ Modo RAG desactivado";

pub const RAG_INDICATOR: &str = "🔍 RAG";
pub const ZERO_SHOT_INDICATOR: &str = "🧠 Zero-shot";

pub const SOURCES_PREFIX: &str = "📚 **Fuentes consultadas**:";

pub const NOT_INITIALIZED: &str =
    "⚠️ El chatbot no está inicializado. Falta OPENROUTER_API_KEY en las variables de entorno.";

pub const HELP_TEXT: &str = r#"**Ayuda del Chatbot de Guaraní**

📝 **Comandos disponibles**:
- `/rag on` - Activar RAG (usa documentos de gramática)
- `/rag off` - Desactivar RAG (solo conocimiento del modelo)
- `/help` - Mostrar esta ayuda

💬 **Ejemplos de preguntas**:
- ¿Cómo se dice "hola" en guaraní?
- ¿Cuáles son los pronombres personales en guaraní?
- ¿Cómo se conjuga el verbo "ir"?
- ¿Cuál es la estructura de las oraciones?"#;

/// Welcome text. Replace `{model}` and `{rag_status}` before sending.
pub const WELCOME_TEMPLATE: &str = r#"✅ **Chatbot de Guaraní listo!**

🤖 **Modelo**: {model}
📚 **Modo**: {rag_status}

💡 **Comandos especiales**:
- `/rag on` - Activar modo RAG (con base de conocimiento)
- `/rag off` - Desactivar modo RAG (solo conocimiento del modelo)
- `/help` - Mostrar ayuda

¡Puedes empezar a hacer preguntas sobre el idioma guaraní!"#;

pub const RAG_STATUS_READY: &str = "RAG activado (usando base de conocimiento)";
pub const RAG_STATUS_UNAVAILABLE: &str =
    "RAG no disponible (índice sin cargar, las respuestas usan solo el modelo)";
