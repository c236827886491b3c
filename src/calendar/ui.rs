//! Display lookups over the global calendar config.

use super::global::GlobalCalendarConfig;
use crate::text::capitalize_first;
use serde_json::Value;

pub const DEFAULT_LANGUAGE: &str = "es";

/// Icons, colours, month names and task labels for one global config.
///
/// Month labels default to [`DEFAULT_LANGUAGE`]; see [`Self::with_language`].
#[derive(Debug, Clone, Copy)]
pub struct UiHelpers<'a> {
    config: &'a GlobalCalendarConfig,
    language: &'a str,
}

impl<'a> UiHelpers<'a> {
    pub fn new(config: &'a GlobalCalendarConfig) -> Self {
        Self {
            config,
            language: DEFAULT_LANGUAGE,
        }
    }

    /// Use `language` (a `month_names` key such as `en`) for month labels.
    pub fn with_language(mut self, language: &'a str) -> Self {
        self.language = language;
        self
    }

    pub fn language(&self) -> &'a str {
        self.language
    }

    pub fn category_icon(&self, category: &str) -> &'a str {
        let icons = &self.config.ui_config.category_icons;
        icons
            .get(category)
            .or_else(|| icons.get("default"))
            .map(String::as_str)
            .unwrap_or("🌱")
    }

    pub fn task_icon(&self, task: &str) -> &'a str {
        let icons = &self.config.ui_config.task_icons;
        icons
            .get(task)
            .or_else(|| icons.get("default"))
            .map(String::as_str)
            .unwrap_or("•")
    }

    pub fn task_priority(&self, task: &str) -> &'a str {
        self.config
            .ui_config
            .task_priorities
            .get(task)
            .map(String::as_str)
            .unwrap_or("normal")
    }

    pub fn activity_color(&self, activity: &str) -> &'a str {
        self.config
            .ui_config
            .activity_colors
            .get(activity)
            .map(String::as_str)
            .unwrap_or("#718096")
    }

    fn month_entry<'t>(table: &'t [String], month: i64) -> Option<&'t String> {
        usize::try_from(month - 1).ok().and_then(|i| table.get(i))
    }

    /// `3` → `Marzo`; out of range gives `Month 3`.
    pub fn month_name(&self, month: i64, language: &str) -> String {
        self.config
            .month_names
            .get(language)
            .and_then(|names| Self::month_entry(names, month))
            .cloned()
            .unwrap_or_else(|| format!("Month {month}"))
    }

    /// [`Self::month_name`] in this helper's language.
    pub fn month_label(&self, month: i64) -> String {
        self.month_name(month, self.language)
    }

    /// Case-insensitive reverse of [`Self::month_name`].
    pub fn month_number(&self, name: &str, language: &str) -> Option<i64> {
        let wanted = name.to_lowercase();
        self.config
            .month_names
            .get(language)?
            .iter()
            .position(|n| n.to_lowercase() == wanted)
            .map(|i| i as i64 + 1)
    }

    /// URL slug for a month, from `month_slugs` or the lowercased name.
    pub fn month_slug(&self, month: i64, language: &str) -> Option<String> {
        if let Some(slug) = self
            .config
            .month_slugs
            .get(language)
            .and_then(|slugs| Self::month_entry(slugs, month))
        {
            return Some(slug.clone());
        }
        self.config
            .month_names
            .get(language)
            .and_then(|names| Self::month_entry(names, month))
            .map(|name| name.to_lowercase())
    }

    pub fn seasonal_tips(&self, month: i64) -> Option<&'a Value> {
        self.config.seasonal_tips.get(&month.to_string())
    }

    /// Site translation string from `ui_config.translation_strings`.
    pub fn translation(&self, key: &str, language: &str) -> Option<&'a str> {
        self.config
            .ui_config
            .translation_strings
            .get(language)?
            .get(key)
            .map(String::as_str)
    }

    /// Spanish label for a task or attribute id; unknown ids are title-cased.
    pub fn format_task_name(&self, task: &str) -> String {
        match task_label(task) {
            Some(label) => label.to_string(),
            None => title_case(&task.replace('_', " ")),
        }
    }

    /// `arboles_frutales` → `Arboles frutales`.
    pub fn format_category_name(&self, category: &str) -> String {
        capitalize_first(&category.replace('_', " "))
    }

    /// `rosa-banksiae` → `Rosa banksiae`.
    pub fn format_plant_name(&self, slug: &str) -> String {
        capitalize_first(&slug.replace('-', " "))
    }
}

/// Uppercase the first letter of every word, leave the rest as is.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        let word_char = c.is_alphanumeric();
        if word_char && !in_word {
            out.extend(c.to_uppercase());
        } else {
            out.push(c);
        }
        in_word = word_char;
    }
    out
}

fn task_label(task: &str) -> Option<&'static str> {
    let label = match task {
        // activities
        "sowing" => "Siembra",
        "transplanting" => "Trasplante",
        "harvesting" => "Cosecha",
        "flowering" => "Floración",
        "planting" => "Plantación",
        "pruning" => "Poda",
        "watering" => "Riego",
        "fertilizing" => "Fertilización",
        "weeding" => "Deshierbe",
        "mulching" => "Acolchado",
        // tasks
        "prepare_seedbeds" => "Preparar Semilleros",
        "transplant" => "Trasplante",
        "install_supports" => "Instalar Soportes",
        "moderate_watering" => "Riego Moderado",
        "heavy_watering" => "Riego Abundante",
        "light_watering" => "Riego Ligero",
        "prune_shoots" => "Podar Brotes",
        "prune_main" => "Poda Principal",
        "deadheading" | "deadhead" => "Eliminar Flores Marchitas",
        "fertilize" => "Fertilizar",
        "pest_monitoring" => "Monitoreo de Plagas",
        "harvest_early" => "Cosecha Temprana",
        "harvest_main" => "Cosecha Principal",
        "harvest_late" => "Cosecha Tardía",
        "plant_cleanup" => "Limpieza de Plantas",
        "seed_collection" => "Recolección de Semillas",
        "water_restriction" => "Restricción de Riego",
        "thinning" => "Raleo",
        "pinching" => "Despunte",
        "staking" => "Entutorado",
        "soil_preparation" => "Preparación del Suelo",
        // plant types
        "annual" => "Anual",
        "perennial" => "Perenne",
        "biennial" => "Bienal",
        // difficulty
        "beginner" => "Principiante",
        "intermediate" => "Intermedio",
        "advanced" => "Avanzado",
        // soil
        "well_drained" => "Bien Drenado",
        "well_drained_fertile" => "Bien Drenado y Fértil",
        "sandy" => "Arenoso",
        "sandy_loam" => "Franco Arenoso",
        "clay" => "Arcilloso",
        "clay_loam" => "Franco Arcilloso",
        "organic_rich" => "Rico en Orgánicos",
        "acidic" => "Ácido",
        "alkaline" => "Alcalino",
        "neutral" => "Neutro",
        "poor" => "Pobre",
        "rocky" => "Rocoso",
        "moist" => "Húmedo",
        "dry" => "Seco",
        // sun
        "full_sun" => "Pleno Sol",
        "partial_sun" => "Sol Parcial",
        "partial_shade" => "Sombra Parcial",
        "full_shade" => "Sombra Completa",
        "afternoon_shade" => "Sombra de Tarde",
        "morning_sun" => "Sol de Mañana",
        "evening_sun" => "Sol de Tarde",
        // water
        "low" => "Bajo",
        "moderate" => "Moderado",
        "high" => "Alto",
        // preservation
        "oil_infusion" => "Infusión en Aceite",
        "drying" => "Secado",
        "freezing" => "Congelación",
        "canning" => "Enlatado",
        "dehydrating" => "Deshidratación",
        "pickling" => "Encurtido",
        "fermentation" => "Fermentación",
        // harvest indicators
        "aroma" => "Aroma",
        "full_bloom" => "Floración Completa",
        "color_change" => "Cambio de Color",
        "size" => "Tamaño",
        "firmness" => "Firmeza",
        // purposes
        "companion_benefit" => "Beneficio como Planta Compañera",
        "pest_control" => "Control de Plagas",
        "soil_improvement" => "Mejora del Suelo",
        "pollinator_attraction" => "Atracción de Polinizadores",
        // origins
        "mediterranean" => "Mediterráneo",
        "tropical" => "Tropical",
        "temperate" => "Templado",
        "subtropical" => "Subtropical",
        "native" => "Nativo",
        // placement
        "indoor" => "Interior",
        "outdoor" => "Exterior",
        "container" => "Contenedor",
        "ground" => "Suelo",
        "greenhouse" => "Invernadero",
        // care tasks
        "monitor_growth" => "Monitorear Crecimiento",
        "remove_mulch" => "Retirar Acolchado",
        "fertilize_light" => "Fertilización Ligera",
        "water_moderately" => "Regar Moderadamente",
        "enjoy_blooms" => "Disfrutar Flores",
        "deadhead_spent" => "Eliminar Flores Pasadas",
        "allow_foliage_yellow" => "Permitir Amarilleo",
        "lift_bulbs_optional" => "Levantar Bulbos (Opcional)",
        "store_dry" => "Almacenar en Seco",
        "prepare_beds" => "Preparar Canteros",
        "mulch_protection" => "Protección con Acolchado",
        "reduce_watering" => "Reducir Riego",
        "minimal_care" => "Cuidado Mínimo",
        "windbreak_check" => "Revisión de Rompevientos",
        "fertilize_seedlings" => "Fertilizar Plántulas",
        "water_regularly" => "Riego Regular",
        "water_content" => "Contenido de Agua",
        "enjoy_fragrance" => "Disfrutar Fragancia",
        "lift_tubers" => "Levantar Tubérculos",
        "lifting_time" => "Tiempo de Levantado",
        "prepare_winter" => "Preparar Invierno",
        "store_tubers_cool_dry" => "Almacenar Tubérculos Fresco y Seco",
        "mulch" => "Acolchar",
        "remove_old_leaves" => "Eliminar Hojas Viejas",
        "remove_runners" => "Eliminar Estolones",
        "deadhead_daily" => "Eliminar Flores Diariamente",
        "minimal_water" | "minimal_watering" => "Riego Mínimo",
        "prepare_supports" => "Preparar Soportes",
        "mulch_for_winter" => "Acolchar para Invierno",
        "water_establishment" => "Riego para Establecimiento",
        "enjoy_color_changes" => "Disfrutar Cambios de Color",
        "monitor_flower_development" => "Monitorear Desarrollo Floral",
        "prepare_coastal_beds" => "Preparar Parterres Costeros",
        "prepare_wet_beds" => "Preparar Canteros Húmedos",
        "water_garden" => "Jardín Acuático",
        "water_lightly" => "Regar Ligeramente",
        "remove_spent" => "Eliminar Gastadas",
        "water_base_only" => "Regar Solo la Base",
        "water_carefully" => "Regar Cuidadosamente",
        "fertilize_orchid" => "Fertilizar Orquídea",
        "increase_watering" => "Aumentar Riego",
        "monitor_pods" => "Monitorear Vainas",
        "prepare_soil" => "Preparar Suelo",
        "store_cool_dark" => "Almacenar Fresco y Oscuro",
        "store_properly" => "Almacenar Adecuadamente",
        "water_deeply" => "Regar Profundamente",
        "prepare_outdoor" => "Preparar Exterior",
        "low_water_content" => "Bajo Contenido de Agua",
        "salt_tolerance_check" => "Revisión de Tolerancia a la Sal",
        _ => return None,
    };
    Some(label)
}
