//! Built-in Italian catalog data.

use super::{CatalogData, Entry, Hedge, Templates, Vocabularies};

type Table = &'static [(&'static str, &'static [&'static str])];

// ---------------------------------------------------------------------------
// Lexical tables
// ---------------------------------------------------------------------------

const BLACKLIST: Table = &[
    ("fondamentale", &["di fondo", "centrale", "essenziale", "principale"]),
    ("fondamentali", &["di fondo", "centrali", "essenziali", "principali"]),
    ("pertanto", &["quindi", "perciò", "così"]),
    ("in conclusione", &["per chiudere", "alla fine", "tirando le fila"]),
    ("cruciale", &["decisivo", "centrale", "che pesa"]),
    ("cruciali", &["decisivi", "centrali"]),
    ("inoltre", &["poi", "e poi", "oltre a questo"]),
    ("tuttavia", &["però", "eppure", "ma"]),
    ("imprescindibile", &["necessario", "indispensabile"]),
    ("peculiare", &["singolare", "tipico", "specifico"]),
    ("approfondire", &["esaminare", "studiare meglio", "guardare da vicino"]),
    ("sinergia", &["collaborazione", "intesa"]),
    ("olistico", &["complessivo", "d'insieme"]),
    ("paradigma", &["modello", "schema"]),
    ("evidenziare", &["mostrare", "mettere in luce", "far vedere"]),
    ("sottolineare", &["ricordare", "far notare", "dire chiaro"]),
    ("in definitiva", &["alla fine", "insomma", "tutto considerato"]),
    ("risulta evidente", &["si vede bene", "è chiaro", "salta all'occhio"]),
    ("in ultima analisi", &["alla fine", "a conti fatti"]),
    ("di conseguenza", &["così", "per questo", "e allora"]),
    ("ulteriormente", &["ancora", "di più", "ancora di più"]),
    ("notevole", &["grosso", "considerevole", "forte"]),
    ("notevoli", &["grossi", "considerevoli", "forti"]),
    ("innovativo", &["nuovo", "originale"]),
    ("innovativa", &["nuova", "originale"]),
    ("tematica", &["questione", "faccenda"]),
    ("tematiche", &["questioni", "faccende"]),
    ("effettuare", &["fare", "svolgere", "condurre"]),
    ("delineare", &["tracciare", "descrivere", "abbozzare"]),
    ("indubbiamente", &[]),
    ("senza ombra di dubbio", &[]),
    ("chiaramente", &[]),
];

const PHRASES: Table = &[
    ("è importante notare che", &["va detto che", "c'è da dire che", "conta che"]),
    ("gioca un ruolo fondamentale", &["pesa molto", "conta parecchio", "ha un peso enorme"]),
    ("svolge un ruolo", &["ha un ruolo", "ha una parte"]),
    ("un ruolo chiave", &["un peso decisivo", "una parte centrale"]),
    ("al giorno d'oggi", &["oggi", "adesso", "ormai"]),
    ("in altre parole", &["detto altrimenti", "cioè", "per dirla semplice"]),
    ("d'altra parte", &["d'altro canto", "però", "dall'altro lato"]),
    ("allo stesso tempo", &["intanto", "nel frattempo", "insieme"]),
    ("in questo contesto", &["qui", "in questo quadro", "a questo punto"]),
    ("nell'ambito della", &["nel campo della", "dentro la"]),
    ("nell'ambito del", &["nel campo del", "dentro il"]),
    ("un ampio ventaglio di", &["una serie di", "un bel po' di", "un mucchio di"]),
    ("un'ampia gamma di", &["una serie di", "un bel po' di"]),
    ("a tal proposito", &["su questo", "a questo riguardo", "qui"]),
    ("è possibile affermare che", &["si può dire che", "viene da dire che"]),
    ("risulta fondamentale", &["conta molto", "è decisivo"]),
    ("è fondamentale", &["conta molto", "è decisivo", "è centrale"]),
    ("alla luce di quanto detto", &["visto tutto questo", "con queste premesse"]),
    ("in maniera significativa", &["parecchio", "in modo netto", "sensibilmente"]),
    ("al fine di", &["per", "così da", "allo scopo di"]),
    ("nel corso degli anni", &["col tempo", "negli anni", "anno dopo anno"]),
    ("sempre più importante", &["sempre più centrale", "via via più pesante"]),
];

const REPETITIVE: Table = &[
    ("importante", &["rilevante", "di peso", "non da poco"]),
    ("significativo", &["netto", "consistente", "marcato"]),
    ("molto", &["parecchio", "assai", "davvero"]),
    ("quindi", &["perciò", "così", "allora"]),
    ("infatti", &["in effetti", "del resto"]),
    ("particolare", &["singolare", "speciale"]),
    ("diversi", &["vari", "parecchi", "svariati"]),
    ("aspetto", &["lato", "punto", "elemento"]),
    ("problema", &["nodo", "guaio", "punto critico"]),
    ("grande", &["enorme", "forte", "rilevante"]),
    ("sviluppo", &["progresso", "avanzamento"]),
    ("processo", &["percorso", "meccanismo"]),
];

const FORMAL_OPENERS: Table = &[
    ("Nel contesto attuale", &["Oggi", "Di questi tempi", "Ora come ora"]),
    ("Nell'era moderna", &["Oggi", "Ai giorni nostri"]),
    ("Negli ultimi anni", &["Da qualche anno", "Di recente", "Ultimamente"]),
    ("Nel panorama attuale", &["Oggi", "Ora come ora"]),
    ("Fin dall'antichità", &["Da sempre", "Da secoli"]),
    ("Nel corso della storia", &["Nella storia", "Da secoli"]),
    ("In un mondo in continua evoluzione", &["In un mondo che cambia", "Con tutto che cambia"]),
];

const HEDGES: &[(&str, &str)] = &[
    ("in un certo senso", ""),
    ("per così dire", ""),
    ("in qualche modo", ""),
    ("per certi versi", ""),
    ("in linea di massima", ""),
    ("sostanzialmente", ""),
    ("tendenzialmente", ""),
    ("si potrebbe dire che", ""),
    ("forse probabilmente", "forse"),
    ("probabilmente forse", "probabilmente"),
    ("forse magari", "forse"),
    ("magari forse", "magari"),
    ("potrebbe forse", "potrebbe"),
    ("potrebbe eventualmente", "potrebbe"),
    ("sembrerebbe quasi", "sembra"),
];

// ---------------------------------------------------------------------------
// Structural tables
// ---------------------------------------------------------------------------

const META_ASIDES: Table = &[
    ("vale la pena notare che", &["", "va detto che", "c'è da dire che"]),
    ("è importante sottolineare che", &["", "va detto che", "conta il fatto che"]),
    ("come abbiamo visto", &["", "come si è visto", "lo si è già visto"]),
    ("come già accennato", &["", "come detto"]),
    ("è bene ricordare che", &["", "non va dimenticato che"]),
    ("come è noto", &["", "si sa"]),
    ("analizziamo ora", &["vediamo", "passiamo a", "guardiamo adesso"]),
    ("in questo paragrafo", &["qui", "in queste righe"]),
    ("nel presente lavoro", &["qui", "in queste pagine"]),
];

const CONNECTIVE_SWAPS: Table = &[
    ("Inoltre", &["", "Poi", "E poi,"]),
    ("Tuttavia", &["Però", "Ma", "Eppure"]),
    ("Infatti", &["", "E in effetti"]),
    ("Pertanto", &["", "Così", "Per questo"]),
    ("Quindi", &["", "Così", "Allora"]),
    ("Infine", &["", "E alla fine"]),
    ("Successivamente", &["", "Poi", "Dopo"]),
    ("Innanzitutto", &["", "Per cominciare,"]),
    ("Dunque", &["", "Allora"]),
    ("Di conseguenza", &["", "Così", "Per questo"]),
    ("Allo stesso modo", &["", "Anche qui"]),
    ("Parallelamente", &["", "Intanto"]),
    ("In aggiunta", &["", "Poi"]),
    ("Oltretutto", &["", "E poi"]),
    ("Analogamente", &["", "Anche qui"]),
];

const SUMMARY_CLOSERS: Table = &[
    ("In sintesi", &["", "Insomma,", "Alla fine"]),
    ("In definitiva", &["", "Insomma,"]),
    ("Riassumendo", &["", "Insomma,"]),
    ("Per riassumere", &["", "Insomma,"]),
    ("Tirando le somme", &["", "Alla fine"]),
    ("In breve", &["", "Insomma,"]),
    ("Per concludere", &["", "E per chiudere,"]),
    ("In conclusione", &["", "Insomma,"]),
];

const NUMERIC_OPENER_TEMPLATES: &[&str] = &[
    "Parliamo di {num}: {verb}",
    "Quanto al {num}, {verb}",
    "{num}, appunto: {verb}",
    "Sul {num} non si scappa: {verb}",
];

const RHETORICAL_TEMPLATES: &[&str] = &[
    "Ci si potrebbe chiedere {question}: {answer}{end}",
    "Se ci si chiede {question}, la risposta è breve: {answer}{end}",
    "Ecco {question}: {answer}{end}",
    "{Question}, in fondo, è presto detto: {answer}{end}",
];

const ANTITHESIS_TEMPLATES: &[&str] = &[
    "a prima vista{middle}{joint}{ma}alla prova dei fatti",
    "in apparenza{middle}{joint}{ma}quando si passa ai fatti",
    "almeno nelle intenzioni{middle}{joint}{ma}a conti fatti",
    "a leggerla così{middle}{joint}{ma}poi, nella realtà,",
];

const ENUMERATION_TEMPLATES: &[&str] = &[
    "Da una parte c'è {x}, dall'altra {y}.",
    "C'è {x}, certo, ma pesa anche {y}.",
    "Conta {x}, e accanto conta pure {y}.",
    "Da una parte c'è {x}, dall'altra {y}; e in mezzo, {z}.",
    "C'è {x}, certo. Poi {y}, e alla fine anche {z}.",
    "Il quadro mette insieme {x}, {y} e, più in là, {z}.",
];

const AUTHORITY_TEMPLATES: &[&str] = &[
    "Secondo {subject}, ",
    "Per {subject}, ",
    "Stando {a_subject}, ",
    "Se si dà retta {a_subject}, ",
];

const HEADING_QUESTION_TEMPLATES: &[&str] = &[
    "{title}?",
    "E {title_lower}?",
    "{title}: come funziona?",
    "Che cosa sappiamo su {title_lower}?",
];

// ---------------------------------------------------------------------------
// Human-noise vocabularies
// ---------------------------------------------------------------------------

const COLLOQUIALISMS: &[&str] = &[
    "diciamolo",
    "a dirla tutta",
    "tutto sommato",
    "in fin dei conti",
    "alla fin fine",
    "come dire",
    "per capirci",
    "detto fra noi",
    "insomma",
];

const UNCERTAINTY: &[&str] = &[
    "almeno credo",
    "mi pare",
    "se non sbaglio",
    "a quanto pare",
    "per quel che ne so",
    "almeno in parte",
    "o così sembra",
];

const CONNECTORS: &[&str] = &["E", "Ma", "Però", "Eppure", "Poi"];

const SELF_CORRECTIONS: &[&str] = &[
    "anzi, no",
    "o meglio",
    "cioè, più precisamente",
    "diciamo meglio",
    "scusate, correggo",
];

const ASIDES: &[&str] = &[
    "e non è poco",
    "ma questo è un altro discorso",
    "lo so, sembra ovvio",
    "per quanto valga",
    "chi l'avrebbe detto",
    "ci torneremo",
];

const DASH_INSERTIONS: &[&str] = &[
    "e qui sta il punto",
    "non a caso",
    "va detto",
    "per quanto strano",
    "lo dico subito",
    "e non è un dettaglio",
];

const ABRUPT_TRANSITIONS: &[&str] = &[
    "Ma andiamo avanti.",
    "Comunque.",
    "Torniamo a noi.",
    "Ecco.",
    "Detto questo, avanti.",
    "Ma non divaghiamo.",
];

// ---------------------------------------------------------------------------
// Assembly
// ---------------------------------------------------------------------------

fn entries(table: Table) -> Vec<Entry> {
    table
        .iter()
        .map(|(term, alternatives)| Entry {
            term: (*term).to_string(),
            alternatives: strings(alternatives),
        })
        .collect()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

pub(super) fn data() -> CatalogData {
    CatalogData {
        blacklist: entries(BLACKLIST),
        phrases: entries(PHRASES),
        repetitive: entries(REPETITIVE),
        formal_openers: entries(FORMAL_OPENERS),
        hedges: HEDGES
            .iter()
            .map(|(cluster, replacement)| Hedge {
                cluster: (*cluster).to_string(),
                replacement: (*replacement).to_string(),
            })
            .collect(),
        meta_asides: entries(META_ASIDES),
        connective_swaps: entries(CONNECTIVE_SWAPS),
        summary_closers: entries(SUMMARY_CLOSERS),
        templates: Templates {
            numeric_opener: strings(NUMERIC_OPENER_TEMPLATES),
            rhetorical_answer: strings(RHETORICAL_TEMPLATES),
            antithesis: strings(ANTITHESIS_TEMPLATES),
            enumeration: strings(ENUMERATION_TEMPLATES),
            authority: strings(AUTHORITY_TEMPLATES),
            heading_question: strings(HEADING_QUESTION_TEMPLATES),
        },
        vocabularies: Vocabularies {
            colloquialisms: strings(COLLOQUIALISMS),
            uncertainty: strings(UNCERTAINTY),
            connectors: strings(CONNECTORS),
            self_corrections: strings(SELF_CORRECTIONS),
            asides: strings(ASIDES),
            dash_insertions: strings(DASH_INSERTIONS),
            abrupt_transitions: strings(ABRUPT_TRANSITIONS),
        },
    }
}
