//! Equipment Catalog - Static reference data for known lab equipment
//!
//! Loaded once at startup, read-only afterwards. Entry order is preserved:
//! it defines the candidate order fed to the belief engine, which in turn
//! fixes tie order in ranked results.

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

// ============================================================================
// TYPES
// ============================================================================

/// Reference information for one equipment kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EquipmentInfo {
    /// Display name, e.g. "Conical Flask (Erlenmeyer Flask)"
    pub name: String,
    /// Alternative labels a classifier might produce
    #[serde(default)]
    pub aliases: Vec<String>,
    pub description: String,
    #[serde(default)]
    pub safety_warnings: Vec<String>,
    #[serde(default)]
    pub usage: Vec<String>,
    #[serde(default)]
    pub steps: Vec<String>,
}

/// One catalog entry: identity key plus its reference info.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Opaque identity key, e.g. "beaker"
    pub id: String,
    #[serde(flatten)]
    pub info: EquipmentInfo,
}

/// Insertion-ordered catalog of known equipment kinds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquipmentCatalog {
    entries: Vec<CatalogEntry>,
}

// ============================================================================
// CATALOG API
// ============================================================================

impl EquipmentCatalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Identity keys in insertion order.
    pub fn identities(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.id.clone()).collect()
    }

    /// Look up reference info by identity key.
    pub fn get(&self, id: &str) -> Option<&EquipmentInfo> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.info)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a catalog from a JSON array of entries.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let file = File::open(path.as_ref())?;
        let entries: Vec<CatalogEntry> = serde_json::from_reader(BufReader::new(file))?;
        log::info!(
            "Loaded equipment catalog: {} entries from {}",
            entries.len(),
            path.as_ref().display()
        );
        Ok(Self { entries })
    }

    /// Built-in catalog covering common lab equipment.
    pub fn builtin() -> Self {
        let entry = |id: &str,
                     name: &str,
                     aliases: &[&str],
                     description: &str,
                     warnings: &[&str],
                     usage: &[&str],
                     steps: &[&str]| CatalogEntry {
            id: id.to_string(),
            info: EquipmentInfo {
                name: name.to_string(),
                aliases: aliases.iter().map(|s| s.to_string()).collect(),
                description: description.to_string(),
                safety_warnings: warnings.iter().map(|s| s.to_string()).collect(),
                usage: usage.iter().map(|s| s.to_string()).collect(),
                steps: steps.iter().map(|s| s.to_string()).collect(),
            },
        };

        Self {
            entries: vec![
                entry(
                    "beaker",
                    "Beaker",
                    &["cup", "container"],
                    "A cylindrical glass container used for mixing, heating, and storing liquids in the laboratory.",
                    &[
                        "Handle with care as glass can break",
                        "Check for cracks before use",
                        "Never fill above the marking line",
                        "Allow to cool before touching after heating",
                    ],
                    &[
                        "Mixing and stirring liquids",
                        "Heating solutions (over direct heat)",
                        "Temporary storage of chemicals",
                        "Measuring and pouring",
                    ],
                    &[
                        "Inspect the beaker for any cracks or chips",
                        "Place on heat-resistant surface",
                        "Use a stirring rod for mixing",
                        "Add contents slowly to prevent splashing",
                        "Use appropriate heating source if needed",
                        "Allow to cool before handling if heated",
                    ],
                ),
                entry(
                    "flask",
                    "Conical Flask (Erlenmeyer Flask)",
                    &["erlenmeyer flask", "conical container"],
                    "A conical glass flask with a flat bottom, used for mixing, heating, and storing solutions.",
                    &[
                        "Check for cracks before use",
                        "Never heat on direct flame without using appropriate heat source",
                        "Ensure flat base is stable on surface",
                        "Let cool before touching after heating",
                    ],
                    &[
                        "Titrations and volumetric work",
                        "Swirling and mixing solutions",
                        "Heating liquids (with indirect heat)",
                        "Reducing spill hazard during mixing",
                    ],
                    &[
                        "Inspect flask for damage",
                        "Place on stable, heat-resistant surface",
                        "Add solution gradually",
                        "Use appropriate heating equipment",
                        "Swirl gently to mix contents",
                        "Allow adequate cooling time",
                    ],
                ),
                entry(
                    "test tube",
                    "Test Tube",
                    &["tube", "reaction vessel"],
                    "A small cylindrical glass tube, open at the top, used for holding small amounts of chemicals.",
                    &[
                        "Never point opening toward yourself or others",
                        "Use test tube holder when heating",
                        "Check for cracks or rough edges",
                        "Allow heated tubes to cool before touching",
                    ],
                    &[
                        "Small-scale chemical reactions",
                        "Testing substances",
                        "Heating small volumes of liquid",
                        "Mixing reagents",
                    ],
                    &[
                        "Secure tube in test tube holder",
                        "Add chemicals as required",
                        "If heating, use gentle heat initially",
                        "Heat from side to side, not straight up",
                        "Remove from heat and allow to cool",
                        "Use stopper if temporary storage needed",
                    ],
                ),
                entry(
                    "microscope",
                    "Optical Microscope",
                    &["optical instrument", "magnification device"],
                    "An optical instrument used to view magnified images of small objects or organisms.",
                    &[
                        "Handle with care - delicate instrument",
                        "Never touch optical surfaces",
                        "Protect from dust and moisture",
                        "Do not force focusing mechanism",
                    ],
                    &[
                        "Viewing microscopic organisms",
                        "Examining small biological specimens",
                        "Analyzing crystal structures",
                        "Observing cell structures",
                    ],
                    &[
                        "Ensure microscope is on stable surface",
                        "Start with lowest magnification lens",
                        "Place specimen on glass slide",
                        "Adjust focus using coarse adjustment knob",
                        "Use fine adjustment for sharp image",
                        "Use higher magnifications for detail",
                        "Clean objective lens with lens paper only",
                    ],
                ),
                entry(
                    "pipette",
                    "Pipette (Dropper)",
                    &["dropper", "pipet"],
                    "A laboratory tool for transferring measured amounts of liquid from one container to another.",
                    &[
                        "Never pipette by mouth",
                        "Check for blockages before use",
                        "Dry thoroughly before each new chemical",
                        "Never leave filled pipette unattended",
                    ],
                    &[
                        "Precise liquid transfer",
                        "Adding reagents dropwise",
                        "Sampling solutions",
                        "Serial dilutions",
                    ],
                    &[
                        "Ensure pipette is clean and dry",
                        "Using bulb or pipette pump, draw liquid",
                        "Hold pipette vertically for transfer",
                        "Place tip at destination vessel",
                        "Slowly release liquid",
                        "Keep tip in liquid until release complete",
                        "Clean immediately after use",
                    ],
                ),
                entry(
                    "burette",
                    "Burette",
                    &["buret", "graduated tube"],
                    "A graduated glass tube with a valve at one end, used for precise volumetric measurement.",
                    &[
                        "Check stopcock works smoothly",
                        "Never force the stopcock",
                        "Check for leaks before use",
                        "Keep clean to prevent valve sticking",
                    ],
                    &[
                        "Titrations",
                        "Precise liquid measurement and dispensing",
                        "Controlled addition of reagents",
                        "Acid-base neutralization analysis",
                    ],
                    &[
                        "Rinse burette three times with small portions of liquid to be used",
                        "Fill burette above zero mark",
                        "Remove air bubbles from tip",
                        "Set initial reading at meniscus",
                        "Open stopcock slowly to dispense",
                        "Record final reading",
                        "Calculate volume dispensed",
                    ],
                ),
                entry(
                    "bunsen burner",
                    "Bunsen Burner",
                    &["burner", "heat source", "lamp"],
                    "A gas burner used in laboratories for heating, sterilization, and combustion reactions.",
                    &[
                        "Keep away from flammable materials",
                        "Do not leave burning unattended",
                        "Allow to cool before handling",
                        "Ensure proper ventilation",
                        "Secure all apparatus over flame",
                        "Check gas connection is secure",
                    ],
                    &[
                        "Heating solutions in beakers and flasks",
                        "Sterilizing wire loops and needles",
                        "Combustion analysis",
                        "Melting substances",
                    ],
                    &[
                        "Clear the work area of flammable materials",
                        "Connect gas hose securely",
                        "Close air hole before lighting",
                        "Light match before turning on gas",
                        "Adjust air hole for blue flame",
                        "Turn off gas when finished",
                    ],
                ),
            ],
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
