//! Constantes del motor core.
//!
//! Valores por defecto de los límites del engine.

/// Máximo de nodos visitados en un único sprint.
pub const DEFAULT_MAX_STEPS_PER_SPRINT: usize = 100;

/// Máximo de veces que una sesión puede reanudarse.
pub const DEFAULT_MAX_RESUMES_PER_SESSION: usize = 500;

/// Límite de caracteres al evaluar templates.
pub const DEFAULT_MAX_TEMPLATE_CHARS: usize = 10_000;

/// Límite de caracteres para valores de campos del contacto.
pub const DEFAULT_MAX_FIELD_CHARS: usize = 640;

/// Límite de caracteres para valores de resultados.
pub const DEFAULT_MAX_RESULT_CHARS: usize = 640;
