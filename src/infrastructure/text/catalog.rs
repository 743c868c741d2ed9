//! Built-in text catalog

use crate::application::ports::TextResolver;
use crate::domain::upload::Language;

const ES: &[(&str, &str)] = &[
    ("NoFileProvided", "Selecciona un archivo de audio."),
    ("UnrecognizedMediaType", "El archivo no parece ser audio. Formatos recomendados: WAV, MP3, M4A."),
    ("SizeExceedsLimit", "El archivo supera el máximo de {limit_mb} MB. Sube un extracto o una parte del episodio."),
    ("SelectionLocked", "Espera a que termine el procesamiento antes de elegir otro archivo."),
    ("ServiceUnreachable", "No se pudo contactar el servicio. Revisa tu conexión e intenta nuevamente."),
    ("RequestRejected", "El servicio rechazó el archivo."),
    ("ServiceFailure", "Ocurrió un error al procesar el audio. Intenta nuevamente más tarde."),
    ("MalformedResponse", "El servicio devolvió una respuesta inválida. Intenta nuevamente."),
    ("DownloadFailed", "No se pudo descargar el archivo."),
    ("status.selected", "Archivo listo: {name} ({size})"),
    ("status.processing", "Procesando…"),
    ("status.ready", "Listo."),
    ("status.saved", "{artifact} guardado en {path} ({size})"),
    ("status.retry", "El archivo sigue seleccionado; vuelve a ejecutar el comando para reintentar."),
    ("status.choose_other", "Prueba con otro archivo de audio."),
    ("artifact.processed", "Audio procesado"),
    ("artifact.report", "Informe detallado"),
    ("mode.laptop", "Laptop / Celular"),
    ("mode.external", "Micrófono externo (USB / Interfaz)"),
    ("report.quality", "Calidad: {score}/100 ({label})"),
    ("report.recommendations", "Recomendaciones:"),
];

const EN: &[(&str, &str)] = &[
    ("NoFileProvided", "Please select an audio file."),
    ("UnrecognizedMediaType", "The file does not look like audio. Recommended formats: WAV, MP3, M4A."),
    ("SizeExceedsLimit", "The file exceeds the {limit_mb} MB limit. Upload a shorter excerpt."),
    ("SelectionLocked", "Wait for processing to finish before choosing another file."),
    ("ServiceUnreachable", "Could not reach the service. Check your connection and try again."),
    ("RequestRejected", "The service rejected the file."),
    ("ServiceFailure", "An error occurred while processing the audio. Please try again later."),
    ("MalformedResponse", "The service returned an invalid response. Please try again."),
    ("DownloadFailed", "The file could not be downloaded."),
    ("status.selected", "File ready: {name} ({size})"),
    ("status.processing", "Processing…"),
    ("status.ready", "Done."),
    ("status.saved", "{artifact} saved to {path} ({size})"),
    ("status.retry", "The file is still selected; run the command again to retry."),
    ("status.choose_other", "Try a different audio file."),
    ("artifact.processed", "Processed audio"),
    ("artifact.report", "Detailed report"),
    ("mode.laptop", "Laptop / Phone"),
    ("mode.external", "External microphone (USB / Interface)"),
    ("report.quality", "Quality: {score}/100 ({label})"),
    ("report.recommendations", "Recommendations:"),
];

/// Static es/en catalog.
///
/// Lookup order is the selected language, then Spanish, then English, then
/// the key itself.
#[derive(Debug, Clone, Copy, Default)]
pub struct Catalog {
    language: Language,
}

impl Catalog {
    pub fn new(language: Language) -> Self {
        Self { language }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    fn table(language: Language) -> &'static [(&'static str, &'static str)] {
        match language {
            Language::Es => ES,
            Language::En => EN,
        }
    }

    fn lookup(language: Language, key: &str) -> Option<&'static str> {
        Self::table(language)
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }
}

impl TextResolver for Catalog {
    fn resolve(&self, key: &str, substitutions: &[(&str, &str)]) -> String {
        let template = Self::lookup(self.language, key)
            .or_else(|| Self::lookup(Language::Es, key))
            .or_else(|| Self::lookup(Language::En, key))
            .unwrap_or(key);

        substitutions
            .iter()
            .fold(template.to_string(), |text, (name, value)| {
                text.replace(&format!("{{{}}}", name), value)
            })
    }
}
