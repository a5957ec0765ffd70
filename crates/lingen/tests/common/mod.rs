//! Shared fixtures: a small bilingual vocabulary, rules and a meaning tree.

use lingen::{LanguageRules, MrTree, Vocabulary};

/// A bilingual (en/de) vocabulary: utterances, actions, creatures.
pub const VOCABULARY: &str = r#"language en
language de

abstract
root
en_info Anything sayable.
en utterance
de Aeusserung

meaning
en Statement
de Aussage
super
en utterance
de Aeusserung
field
en_type action
de_type Handlung
en action
de handlung

abstract
en action
de Handlung

meaning
en_info To consume food.
de_info Nahrung aufnehmen.
en eat
de essen
super
en action
field
en_type creature
en actor
de akteur
field
en_type creature
en target
de ziel
field
en_type *INT
en count
de anzahl

abstract
en creature
de Kreatur
field
en_type *INT
en legs
de beine

meaning
en dog
de Hund
super
en creature
field
en_type *STRING
en_info The dog's name.
en called
de genannt

meaning
en fish
de Fisch
super
en creature

meaning
en puppy
de Welpe
super
en dog
"#;

/// "The dog called Rex eats the fish, twice over."
pub const TREE: &str =
    "en\nStatement\n\taction eat\n\t\tactor dog\n\t\t\tcalled \"Rex\"\n\t\ttarget fish\n\t\tcount 2\n";

pub const EN_RULES: &str = r#"// production rules for english

rules creature
tag noun

rules dog
super creature
rule *,.called,"<.called>"
rule *,*,"the dog"

rules fish
super creature
rule *,*,"the fish"

rules verb
rule subject,*,"<.actor>"

rules eat
super verb
rule *,.count[1],"{subject} eats {object} once"
rule *,*,"{subject} eats {object}"
rule object,*,"<.target>"

rules Statement
rule *,*,"<+.action>."
"#;

pub const DE_RULES: &str = r#"// deutsche regeln

rules Kreatur
tag nomen

rules Hund
super Kreatur
rule *,*,"der Hund"

rules Fisch
super Kreatur
rule *,*,"den Fisch"

rules Verb
rule subjekt,*,"<.akteur>"

rules essen
super Verb
rule *,*,"{subjekt} frisst <.ziel>"

rules Aussage
rule *,*,"<+.handlung>."
"#;

pub fn vocabulary() -> Vocabulary {
    Vocabulary::load_from(VOCABULARY.as_bytes()).expect("fixture vocabulary loads")
}

pub fn tree(vocab: &Vocabulary) -> MrTree {
    MrTree::parse_str(TREE, vocab).expect("fixture tree parses")
}

pub fn english(vocab: &Vocabulary) -> LanguageRules {
    LanguageRules::load_from(EN_RULES.as_bytes(), "en", vocab).expect("fixture rules load")
}

pub fn german(vocab: &Vocabulary) -> LanguageRules {
    LanguageRules::load_from(DE_RULES.as_bytes(), "de", vocab).expect("fixture rules load")
}

/// Empty rules, for tests that only need an evaluation context.
pub fn no_rules(vocab: &Vocabulary) -> LanguageRules {
    LanguageRules::load_from("".as_bytes(), "en", vocab).expect("empty rules load")
}
