//! Option vocabularies of the nursing evaluation, schema version 1.
//!
//! Each list is the set of identifiers a single-select or multi-select group may hold, in the
//! order the options are rendered. The identifiers are stored verbatim in module documents.

pub const STRUTTURA: &[&str] = &["R3", "R3D"];

pub const SI_NO: &[&str] = &["si", "no"];

pub const LATO: &[&str] = &["dx", "sn"];

// comunicazione
pub const STATO_DI_COSCIENZA: &[&str] = &["vigile-collaborante", "soporoso", "comatoso"];
pub const COMUNICAZIONE: &[&str] = &[
    "orientato",
    "disorientato",
    "regolare",
    "disfonia",
    "disartria",
    "afasia",
    "tracheostomia",
];
pub const UDITO: &[&str] = &["normoudente", "ipoacusia", "sordità"];
pub const VISTA: &[&str] = &["normovedente", "riduzione visus", "non vedente"];
pub const PROTESI_VISTA: &[&str] = &["occhiali", "lenti a contatto"];
pub const CONDIZIONI_PSICHICHE: &[&str] = &[
    "tranquillo",
    "irrequieto/ansioso",
    "agitazione psicomotoria",
    "apatia/disinteresse",
    "deficit cognitivo",
];

// respirazione
pub const TIPOLOGIA_RESPIRAZIONE: &[&str] = &["normale", "dispnea"];
pub const DISPNEA_TIPO: &[&str] = &["da sforzo", "a riposo"];
pub const ALLERGIE_RESPIRAZIONE: &[&str] =
    &["bpco", "asma", "pollini", "epiteli animali", "acari"];
pub const PRESIDI_RESPIRAZIONE: &[&str] = &["cpap", "respiratore", "ventilatore", "cannula guedel"];

// circolazione e tessuti cutanei
pub const PRESIDI_PROTESI: &[&str] = &[
    "pace maker",
    "protesi valvolari",
    "sistema port",
    "c.v.c.",
    "altro",
];
pub const CUTE_MUCOSE: &[&str] = &[
    "normocromica",
    "pallida",
    "cianotica",
    "itterica",
    "disidratata",
];
pub const INTEGRITA_CUTANEA: &[&str] = &[
    "ferite chirurgiche",
    "ulcere distrofiche",
    "lividi",
    "edemi",
];
pub const STADIO_LESIONI_DA_DECUBITO: &[&str] = &["1°", "2°", "3°", "4°"];
pub const RISCHIO_LESIONI_BRADEN: &[&str] = &["basso", "medio", "elevato", "molto elevato"];

// stato
pub const ESCURSIONE_ARTICOLARE: &[&str] = &["completa", "altro"];
pub const PRESA: &[&str] = &["normale", "debolezza", "paralisi"];
pub const ANSIA: &[&str] = &["lieve", "moderata", "grave"];
pub const RIPOSO_SONNO: &[&str] = &["regolare", "irregolare", "insonnia"];
pub const TIPO_DOLORE: &[&str] = &["acuto", "cronico"];
pub const CARATTERISTICHE_DOLORE: &[&str] = &["intermittente", "ingravescente", "colico"];
pub const TERAPIA_ANTIDOLORIFICA: &[&str] = &[
    "analgesici",
    "antipiretici",
    "antinfiammatori",
    "oppioidi",
];

// movimento e igiene
pub const AUTONOMIA_MOVIMENTO: &[&str] = &["autonomo", "con assistenza", "non autonomo"];
pub const RISCHIO_CADUTE_CONLEY: &[&str] =
    &["rischio minimo", "aumento del rischio", "rischio alto"];
pub const AUSILI_PRESIDI_MOVIMENTO: &[&str] = &["deambulatore/carrozzina"];
pub const AUTONOMIA_POSTURA: &[&str] = &["autonomo", "postura obbligata"];
pub const POSTURA_OBBLIGATA_CAUSA: &[&str] = &["paralisi", "paresi", "allettato"];
pub const AUSILI_PRESIDI_POSTURA: &[&str] =
    &["sponde per letto", "materasso antidecubito", "altro"];
pub const LAVARSI: &[&str] = &["si lava da solo", "si lava con aiuto", "totale dipendenza"];
pub const VESTIRSI: &[&str] = &["si veste da solo", "si veste con aiuto", "totale dipendenza"];
pub const AUTONOMIA_BAGNO: &[&str] = &[
    "autonomo",
    "con uso di ausili",
    "con assistenza",
    "totale dipendenza",
];

// eliminazione intestinale
pub const GRADO_AUTONOMIA_INTESTINALE: &[&str] = &[
    "alvo regolare",
    "incontinente",
    "diarrea",
    "stipsi",
    "utilizzo lassativi",
    "clisteri evacuativi",
];
pub const CONSISTENZA: &[&str] = &[
    "asciutte-disidratate",
    "soffici",
    "semi liquide",
    "liquide",
];
pub const COLORE_FECI: &[&str] = &[
    "normocromiche",
    "con tracce di sangue",
    "con tracce di muco",
    "melena",
];
pub const PRESIDI_INTESTINALE: &[&str] = &[
    "sedia comoda",
    "padella",
    "pannolone",
    "colostomia/ilestomia",
    "enterostomia",
    "drenaggio",
];

// eliminazione vescicale urinaria
pub const GRADO_AUTONOMIA_URINARIA: &[&str] = &["autonomo", "regolare", "incontinente"];
pub const INCONTINENTE_TIPO: &[&str] = &["totale", "parziale", "urgenza", "sforzo"];
pub const MINZIONE: &[&str] = &["normale", "disuria", "nicturia", "impellente"];
pub const DIURESI_REGOLARITA: &[&str] = &["regolare", "anuria", "oliguria", "poliuria"];
pub const CARATTERISTICHE_URINARIE: &[&str] = &[
    "limpide",
    "ematuria",
    "piuria",
    "con sedimento",
    "ipercromiche",
    "torride",
];
pub const PRESIDI_URINARIA: &[&str] = &[
    "sedia comoda",
    "pappagallo",
    "pannolone",
    "catetere",
    "condom",
    "stomia",
    "drenaggio",
];

// alimentazione e idratazione
pub const AUTONOMIA_ALIMENTAZIONE: &[&str] = &[
    "totale",
    "difficoltà masticazione",
    "parziale con aiuto",
    "totale dipendente",
];
pub const DEGLUTIZIONE: &[&str] = &["normale", "disfagia a solidi", "disfagia a liquidi"];
pub const PROTESI_DENTARIA: &[&str] = &["superiore", "inferiore", "fissa", "mobile"];
pub const PRESIDI_ALIMENTAZIONE: &[&str] = &["sng", "peg/peg-j", "npt", "altro"];
pub const DIETA: &[&str] = &[
    "dieta comune",
    "celiachia",
    "dieta speciale",
    "restrizioni dietetiche",
    "intolleranze",
    "allergie",
];
pub const CAVO_ORALE: &[&str] = &["normale", "arrossamenti", "lesioni", "altro"];
pub const STATO_NUTRIZIONALE_MNA: &[&str] =
    &["buono - normale", "rischio malnutrizione", "malnutrito"];
pub const TIPO_VARIAZIONE_PESO: &[&str] = &["aumento", "perdita"];
pub const GRADO_OBESITA: &[&str] = &[
    "normale (18,5-25)",
    "1° grado (25-30)",
    "2° grado (30-40)",
    "3° grado (>40)",
];
pub const PRESENZA_DI: &[&str] = &[
    "inappetenza",
    "polifagia",
    "disfagia",
    "nausea",
    "conato",
    "vomito",
    "stomatite",
    "cachessia",
];
pub const ADDOME: &[&str] = &["peristalsi", "timpanico", "trattabile", "dolente"];
pub const IDRATAZIONE_STATO: &[&str] = &["idratato", "disidratato", "gravemente disidratato"];
pub const IDRATAZIONE_AUTONOMIA: &[&str] = &["spontanea", "con aiuto", "dipendente"];

// valutazione del rischio
pub const LIVELLO_RISCHIO: &[&str] = &["assente", "basso", "medio", "alto"];
