use crate::backend::BackendError;
use crate::session::Mode;

/// The session operation during which a backend call failed.
///
/// Used to pick the user-facing message, which differs between saving and viewing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operation {
    OpenForm,
    LoadDossiers,
    SelectDossier,
    Save,
    View,
}

#[derive(Debug, thiserror::Error)]
pub enum FormError {
    #[error("required field missing: {field}")]
    MissingRequired {
        field: &'static str,
        message: &'static str,
    },
    #[error("backend error during {operation:?}: {source}")]
    Backend {
        operation: Operation,
        #[source]
        source: BackendError,
    },
    #[error("stored document cannot be displayed: {0}")]
    MalformedDocument(#[from] moduli::ModuliError),
    #[error("no credential available, login required")]
    LoginRequired,
    #[error("form is read-only")]
    ReadOnly,
    #[error("unknown option '{option}' for {field}")]
    UnknownOption { field: &'static str, option: String },
    #[error("no dossier selected")]
    NoDossierSelected,
    #[error("operation requires {expected:?} mode, session is in {actual:?} mode")]
    WrongMode { expected: Mode, actual: Mode },
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl FormError {
    /// Adapter for `map_err` that tags a backend failure with the operation it interrupted.
    pub fn backend(operation: Operation) -> impl FnOnce(BackendError) -> FormError {
        move |source| FormError::Backend { operation, source }
    }

    /// Whether the caller should send the user to the login entry point.
    pub fn requires_login(&self) -> bool {
        matches!(
            self,
            FormError::LoginRequired
                | FormError::Backend {
                    source: BackendError::Unauthenticated,
                    ..
                }
        )
    }

    /// The single message shown to the user for this failure.
    pub fn user_message(&self) -> String {
        match self {
            FormError::MissingRequired { message, .. } => (*message).to_string(),
            FormError::Backend { operation, source } => backend_message(*operation, source),
            FormError::MalformedDocument(moduli::ModuliError::MissingDocument) => {
                "Dati modulo non disponibili".to_string()
            }
            FormError::MalformedDocument(_) => {
                "Il modulo salvato non è leggibile e non può essere visualizzato".to_string()
            }
            FormError::LoginRequired => "Effettua l'accesso per continuare".to_string(),
            FormError::ReadOnly => "Il modulo è in sola lettura".to_string(),
            FormError::UnknownOption { field, option } => {
                format!("Opzione '{option}' non valida per il campo {field}")
            }
            FormError::NoDossierSelected => "Seleziona prima un dossier".to_string(),
            FormError::WrongMode { .. } => "Operazione non disponibile in questa modalità".to_string(),
            FormError::InvalidInput(msg) => format!("Dati non validi: {msg}"),
        }
    }
}

fn backend_message(operation: Operation, source: &BackendError) -> String {
    if matches!(source, BackendError::Unauthenticated) {
        return "Sessione scaduta, effettua di nuovo l'accesso".to_string();
    }

    match operation {
        Operation::Save => match source {
            BackendError::Forbidden(_) => "Non hai i permessi per creare questo modulo.".to_string(),
            BackendError::NotFound(_) => "Dossier o modulo non trovato.".to_string(),
            BackendError::Validation(_) => {
                "Errore di validazione dei dati. Controlla i campi compilati.".to_string()
            }
            other => match other.detail() {
                Some(detail) => detail.to_string(),
                None => "Errore nel salvataggio del modulo".to_string(),
            },
        },
        Operation::View => match source {
            BackendError::Forbidden(_) => "Non hai i permessi per visualizzare questo modulo".to_string(),
            BackendError::NotFound(_) => "Modulo non trovato".to_string(),
            other => format!("Errore nel caricamento: {other}"),
        },
        Operation::OpenForm => format!("Errore nell'inizializzazione: {source}"),
        Operation::LoadDossiers => "Errore nel caricamento dei dossiers".to_string(),
        Operation::SelectDossier => "Errore nella selezione del dossier".to_string(),
    }
}

/// Type alias for Results that can fail with a [`FormError`].
pub type FormResult<T> = Result<T, FormError>;
