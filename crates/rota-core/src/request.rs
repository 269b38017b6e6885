//! Request builder: image + driver count + credential → one model request.
//!
//! The model has no structured-output guarantee, so the instruction spells out
//! the JSON contract field by field and embeds a worked example. The response
//! interpreter stays defensive regardless.

use crate::error::{OptimizeError, OptimizeResult};
use crate::input::ImageInput;

/// Language of the instruction text and of the driver labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptLanguage {
    /// Portuguese, labels "Motorista N"
    #[default]
    Portuguese,
    /// English, labels "Driver N"
    English,
}

impl PromptLanguage {
    /// Parse a language code (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pt" | "pt-pt" | "pt-br" | "portuguese" => Some(Self::Portuguese),
            "en" | "english" => Some(Self::English),
            _ => None,
        }
    }

    /// Labels for drivers `1..=count`, in order.
    pub fn driver_labels(&self, count: u32) -> Vec<String> {
        (1..=count).map(|i| self.driver_label(i)).collect()
    }

    /// Canonical label for the driver at 1-based `index`.
    pub fn driver_label(&self, index: u32) -> String {
        match self {
            Self::Portuguese => format!("Motorista {index}"),
            Self::English => format!("Driver {index}"),
        }
    }
}

/// A fully built optimization request, ready for a provider.
#[derive(Debug, Clone)]
pub struct RouteRequest {
    /// The delivery list image
    pub image: ImageInput,
    /// Instruction text for the model
    pub prompt: String,
    /// Number of routes requested
    pub driver_count: u32,
    /// Labels assigned to the drivers, in order
    pub driver_labels: Vec<String>,
    /// API credential, supplied per call
    pub api_key: String,
    /// Whether to request map grounding
    pub grounding: bool,
}

/// Builds [`RouteRequest`]s with a fixed language and driver limit.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    language: PromptLanguage,
    max_drivers: u32,
    grounding: bool,
}

impl Default for RequestBuilder {
    fn default() -> Self {
        Self {
            language: PromptLanguage::default(),
            max_drivers: 10,
            grounding: true,
        }
    }
}

impl RequestBuilder {
    pub fn new(language: PromptLanguage, max_drivers: u32, grounding: bool) -> Self {
        Self {
            language,
            max_drivers,
            grounding,
        }
    }

    pub fn language(&self) -> PromptLanguage {
        self.language
    }

    /// Build a request for `driver_count` routes from `image`.
    ///
    /// Fails with `InvalidInput` for a driver count outside `1..=max_drivers`
    /// or an empty image, and with `Precondition` for an empty credential.
    pub fn build(
        &self,
        api_key: &str,
        image: ImageInput,
        driver_count: u32,
    ) -> OptimizeResult<RouteRequest> {
        if driver_count < 1 || driver_count > self.max_drivers {
            return Err(OptimizeError::InvalidInput(format!(
                "driver count must be between 1 and {}, got {driver_count}",
                self.max_drivers
            )));
        }
        if image.data.is_empty() || image.byte_len == 0 {
            return Err(OptimizeError::InvalidInput("image is empty".to_string()));
        }
        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(OptimizeError::Precondition(
                "No API key configured. Set GEMINI_API_KEY or run `rota key set`.".to_string(),
            ));
        }

        let driver_labels = self.language.driver_labels(driver_count);
        let prompt = build_prompt(self.language, driver_count)?;

        Ok(RouteRequest {
            image,
            prompt,
            driver_count,
            driver_labels,
            api_key: api_key.to_string(),
            grounding: self.grounding,
        })
    }
}

/// Compose the instruction text for `driver_count` drivers.
///
/// Fails with `InvalidInput` for a count of zero.
pub fn build_prompt(language: PromptLanguage, driver_count: u32) -> OptimizeResult<String> {
    let labels = language.driver_labels(driver_count);
    let Some(first) = labels.first() else {
        return Err(OptimizeError::InvalidInput(
            "driver count must be at least 1".to_string(),
        ));
    };
    let label_list = labels
        .iter()
        .map(|l| format!("'{l}'"))
        .collect::<Vec<_>>()
        .join(", ");
    let example = example_json(&labels);

    let prompt = match language {
        PromptLanguage::Portuguese => format!(
            "Você é um especialista em otimização de logística. Com base na lista de entregas \
             na imagem fornecida, crie {count_word} rotas eficientes e otimizadas para \
             {driver_count} motoristas distintos, chamados {label_list}. Use seu conhecimento \
             de geografia e planejamento de rotas para agrupar locais próximos.\n\n\
             Forneça a saída como um único array JSON minificado. Não inclua nenhum texto antes \
             ou depois do array JSON. Cada objeto no array deve representar a rota de um \
             motorista e deve ter duas chaves: 'driver' (uma string, por exemplo, '{first}') e \
             'route' (um array de objetos de parada).\n\n\
             Cada objeto de parada no array 'route' deve ter as seguintes chaves:\n\
             - 'stop': um número inteiro representando a ordem da parada, começando em 1.\n\
             - 'nome': uma string para o nome do cliente.\n\
             - 'morada': uma string para o endereço de entrega completo.\n\
             - 'caixas': um número inteiro para o número de caixas.\n\
             - 'telefone': uma string para o número de telefone do cliente.\n\n\
             Exemplo do formato JSON necessário:\n{example}\n",
            count_word = portuguese_count(driver_count),
        ),
        PromptLanguage::English => format!(
            "You are a logistics optimization expert. Based on the delivery list in the \
             provided image, create {driver_count} efficient, optimized routes for \
             {driver_count} distinct drivers, named {label_list}. Use your knowledge of \
             geography and route planning to group nearby locations.\n\n\
             Return the output as a single minified JSON array. Do not include any text before \
             or after the JSON array. Each object in the array represents one driver's route \
             and must have two keys: 'driver' (a string, for example '{first}') and 'route' \
             (an array of stop objects).\n\n\
             Each stop object in the 'route' array must have the following keys:\n\
             - 'stop': an integer giving the order of the stop, starting at 1.\n\
             - 'nome': a string with the customer's name.\n\
             - 'morada': a string with the full delivery address.\n\
             - 'caixas': an integer with the number of boxes.\n\
             - 'telefone': a string with the customer's phone number.\n\n\
             Example of the required JSON format:\n{example}\n",
        ),
    };
    Ok(prompt)
}

/// Worked example embedded in the prompt, using at most the first two labels.
fn example_json(labels: &[String]) -> String {
    const SAMPLE_STOPS: [&str; 2] = [
        r#"{"stop":1,"nome":"Ana Costa","morada":"Rua Francisco Franco, 42 Queluz","caixas":3,"telefone":"9632589558"}"#,
        r#"{"stop":1,"nome":"Joao Sousa","morada":"Av Dr. Miguel Bombarda, 219, Queluz","caixas":2,"telefone":"21548555"}"#,
    ];

    let routes: Vec<String> = labels
        .iter()
        .zip(SAMPLE_STOPS)
        .map(|(label, stop)| format!(r#"{{"driver":"{label}","route":[{stop}, ...]}}"#))
        .collect();
    format!("[{}]", routes.join(", "))
}

/// Feminine Portuguese number word ("rotas" is feminine), digits above ten.
fn portuguese_count(n: u32) -> String {
    match n {
        1 => "uma",
        2 => "duas",
        3 => "três",
        4 => "quatro",
        5 => "cinco",
        6 => "seis",
        7 => "sete",
        8 => "oito",
        9 => "nove",
        10 => "dez",
        _ => return n.to_string(),
    }
    .to_string()
}
