use crate::language::deinflector::{DeinflectionRuleGroup, Rules, SuffixRule};

const fn r(
    suffix_in: &'static str,
    suffix_out: &'static str,
    rules_in: Rules,
    rules_out: Rules,
) -> SuffixRule {
    SuffixRule {
        suffix_in,
        suffix_out,
        rules_in,
        rules_out,
    }
}

const NONE: Rules = Rules::NONE;
const V1: Rules = Rules::V1;
const V5: Rules = Rules::V5;
const VS: Rules = Rules::VS;
const VK: Rules = Rules::VK;
const VZ: Rules = Rules::VZ;
const ADJ_I: Rules = Rules::ADJ_I;

/// Japanese suffix inflection table.
///
/// Group names are the rule identifiers surfaced in inflection reason
/// chains. Rows stay close to the classic deinflection table: mostly
/// unrestricted `rules_in` with the dictionary word-class fit check doing
/// the disambiguation.
pub static JAPANESE_DEINFLECTION_RULES: &[DeinflectionRuleGroup] = &[
    DeinflectionRuleGroup {
        name: "-ba",
        rules: &[
            r("ければ", "い", NONE, ADJ_I),
            r("えば", "う", NONE, V5),
            r("けば", "く", NONE, V5),
            r("げば", "ぐ", NONE, V5),
            r("せば", "す", NONE, V5),
            r("てば", "つ", NONE, V5),
            r("ねば", "ぬ", NONE, V5),
            r("べば", "ぶ", NONE, V5),
            r("めば", "む", NONE, V5),
            r("れば", "る", NONE, V1.or(V5).or(VK).or(VS).or(VZ)),
        ],
    },
    DeinflectionRuleGroup {
        name: "-chau",
        rules: &[
            r("ちゃう", "る", NONE, V1),
            r("いちゃう", "く", NONE, V5),
            r("いじゃう", "ぐ", NONE, V5),
            r("しちゃう", "す", NONE, V5),
            r("しちゃう", "する", NONE, VS),
            r("っちゃう", "う", NONE, V5),
            r("っちゃう", "つ", NONE, V5),
            r("っちゃう", "る", NONE, V5),
            r("んじゃう", "ぬ", NONE, V5),
            r("んじゃう", "ぶ", NONE, V5),
            r("んじゃう", "む", NONE, V5),
            r("きちゃう", "くる", NONE, VK),
        ],
    },
    DeinflectionRuleGroup {
        name: "-nasai",
        rules: &[
            r("なさい", "る", NONE, V1),
            r("いなさい", "う", NONE, V5),
            r("きなさい", "く", NONE, V5),
            r("ぎなさい", "ぐ", NONE, V5),
            r("しなさい", "す", NONE, V5),
            r("しなさい", "する", NONE, VS),
            r("ちなさい", "つ", NONE, V5),
            r("になさい", "ぬ", NONE, V5),
            r("びなさい", "ぶ", NONE, V5),
            r("みなさい", "む", NONE, V5),
            r("りなさい", "る", NONE, V5),
            r("きなさい", "くる", NONE, VK),
        ],
    },
    DeinflectionRuleGroup {
        name: "-sou",
        rules: &[
            r("そう", "い", NONE, ADJ_I),
            r("そう", "る", NONE, V1),
            r("いそう", "う", NONE, V5),
            r("きそう", "く", NONE, V5),
            r("しそう", "す", NONE, V5),
            r("しそう", "する", NONE, VS),
            r("りそう", "る", NONE, V5),
            r("みそう", "む", NONE, V5),
            r("きそう", "くる", NONE, VK),
        ],
    },
    DeinflectionRuleGroup {
        name: "-sugiru",
        rules: &[
            r("すぎる", "い", NONE, ADJ_I),
            r("すぎる", "る", NONE, V1),
            r("いすぎる", "う", NONE, V5),
            r("きすぎる", "く", NONE, V5),
            r("しすぎる", "す", NONE, V5),
            r("しすぎる", "する", NONE, VS),
            r("みすぎる", "む", NONE, V5),
            r("りすぎる", "る", NONE, V5),
        ],
    },
    DeinflectionRuleGroup {
        name: "-tai",
        rules: &[
            r("たい", "る", NONE, V1),
            r("いたい", "う", NONE, V5),
            r("きたい", "く", NONE, V5),
            r("ぎたい", "ぐ", NONE, V5),
            r("したい", "す", NONE, V5),
            r("したい", "する", NONE, VS),
            r("ちたい", "つ", NONE, V5),
            r("にたい", "ぬ", NONE, V5),
            r("びたい", "ぶ", NONE, V5),
            r("みたい", "む", NONE, V5),
            r("りたい", "る", NONE, V5),
            r("きたい", "くる", NONE, VK),
        ],
    },
    DeinflectionRuleGroup {
        name: "-tara",
        rules: &[
            r("たら", "る", NONE, V1),
            r("いたら", "く", NONE, V5),
            r("いだら", "ぐ", NONE, V5),
            r("したら", "す", NONE, V5),
            r("したら", "する", NONE, VS),
            r("ったら", "う", NONE, V5),
            r("ったら", "つ", NONE, V5),
            r("ったら", "る", NONE, V5),
            r("んだら", "ぬ", NONE, V5),
            r("んだら", "ぶ", NONE, V5),
            r("んだら", "む", NONE, V5),
            r("かったら", "い", NONE, ADJ_I),
            r("きたら", "くる", NONE, VK),
        ],
    },
    DeinflectionRuleGroup {
        name: "-tari",
        rules: &[
            r("たり", "る", NONE, V1),
            r("いたり", "く", NONE, V5),
            r("いだり", "ぐ", NONE, V5),
            r("したり", "す", NONE, V5),
            r("したり", "する", NONE, VS),
            r("ったり", "う", NONE, V5),
            r("ったり", "つ", NONE, V5),
            r("ったり", "る", NONE, V5),
            r("んだり", "ぬ", NONE, V5),
            r("んだり", "ぶ", NONE, V5),
            r("んだり", "む", NONE, V5),
            r("かったり", "い", NONE, ADJ_I),
            r("きたり", "くる", NONE, VK),
        ],
    },
    DeinflectionRuleGroup {
        name: "-te",
        rules: &[
            r("て", "る", NONE, V1),
            r("いて", "く", NONE, V5),
            r("いで", "ぐ", NONE, V5),
            r("して", "す", NONE, V5),
            r("して", "する", NONE, VS),
            r("って", "う", NONE, V5),
            r("って", "つ", NONE, V5),
            r("って", "る", NONE, V5),
            r("んで", "ぬ", NONE, V5),
            r("んで", "ぶ", NONE, V5),
            r("んで", "む", NONE, V5),
            r("くて", "い", NONE, ADJ_I),
            r("きて", "くる", NONE, VK),
        ],
    },
    DeinflectionRuleGroup {
        name: "-zu",
        rules: &[
            r("ず", "る", NONE, V1),
            r("かず", "く", NONE, V5),
            r("がず", "ぐ", NONE, V5),
            r("さず", "す", NONE, V5),
            r("たず", "つ", NONE, V5),
            r("なず", "ぬ", NONE, V5),
            r("ばず", "ぶ", NONE, V5),
            r("まず", "む", NONE, V5),
            r("らず", "る", NONE, V5),
            r("わず", "う", NONE, V5),
            r("せず", "する", NONE, VS),
            r("こず", "くる", NONE, VK),
        ],
    },
    DeinflectionRuleGroup {
        name: "adv",
        rules: &[r("く", "い", NONE, ADJ_I)],
    },
    DeinflectionRuleGroup {
        name: "causative",
        rules: &[
            r("させる", "る", NONE, V1),
            r("させる", "する", NONE, VS),
            r("かせる", "く", NONE, V5),
            r("がせる", "ぐ", NONE, V5),
            r("させる", "す", NONE, V5),
            r("たせる", "つ", NONE, V5),
            r("なせる", "ぬ", NONE, V5),
            r("ばせる", "ぶ", NONE, V5),
            r("ませる", "む", NONE, V5),
            r("らせる", "る", NONE, V5),
            r("わせる", "う", NONE, V5),
            r("こさせる", "くる", NONE, VK),
        ],
    },
    DeinflectionRuleGroup {
        name: "imperative",
        rules: &[
            r("ろ", "る", NONE, V1),
            r("よ", "る", NONE, V1),
            r("え", "う", NONE, V5),
            r("け", "く", NONE, V5),
            r("げ", "ぐ", NONE, V5),
            r("せ", "す", NONE, V5),
            r("て", "つ", NONE, V5),
            r("ね", "ぬ", NONE, V5),
            r("べ", "ぶ", NONE, V5),
            r("め", "む", NONE, V5),
            r("れ", "る", NONE, V5),
            r("しろ", "する", NONE, VS),
            r("せよ", "する", NONE, VS),
            r("こい", "くる", NONE, VK),
        ],
    },
    DeinflectionRuleGroup {
        name: "masu stem",
        rules: &[
            r("い", "う", NONE, V5),
            r("き", "く", NONE, V5),
            r("ぎ", "ぐ", NONE, V5),
            r("し", "す", NONE, V5),
            r("ち", "つ", NONE, V5),
            r("に", "ぬ", NONE, V5),
            r("び", "ぶ", NONE, V5),
            r("み", "む", NONE, V5),
            r("り", "る", NONE, V5),
        ],
    },
    DeinflectionRuleGroup {
        name: "negative",
        rules: &[
            r("ない", "る", NONE, V1),
            r("かない", "く", NONE, V5),
            r("がない", "ぐ", NONE, V5),
            r("さない", "す", NONE, V5),
            r("たない", "つ", NONE, V5),
            r("なない", "ぬ", NONE, V5),
            r("ばない", "ぶ", NONE, V5),
            r("まない", "む", NONE, V5),
            r("らない", "る", NONE, V5),
            r("わない", "う", NONE, V5),
            r("くない", "い", NONE, ADJ_I),
            r("しない", "する", NONE, VS),
            r("こない", "くる", NONE, VK),
        ],
    },
    DeinflectionRuleGroup {
        name: "noun",
        rules: &[r("さ", "い", NONE, ADJ_I)],
    },
    DeinflectionRuleGroup {
        name: "passive",
        rules: &[
            r("かれる", "く", NONE, V5),
            r("がれる", "ぐ", NONE, V5),
            r("される", "す", NONE, V5),
            r("される", "する", NONE, VS),
            r("たれる", "つ", NONE, V5),
            r("なれる", "ぬ", NONE, V5),
            r("ばれる", "ぶ", NONE, V5),
            r("まれる", "む", NONE, V5),
            r("われる", "う", NONE, V5),
            r("られる", "る", NONE, V5),
        ],
    },
    DeinflectionRuleGroup {
        name: "past",
        rules: &[
            r("た", "る", NONE, V1),
            r("いた", "く", NONE, V5),
            r("いだ", "ぐ", NONE, V5),
            r("した", "す", NONE, V5),
            r("した", "する", NONE, VS),
            r("った", "う", NONE, V5),
            r("った", "つ", NONE, V5),
            r("った", "る", NONE, V5),
            r("んだ", "ぬ", NONE, V5),
            r("んだ", "ぶ", NONE, V5),
            r("んだ", "む", NONE, V5),
            r("かった", "い", NONE, ADJ_I),
            r("きた", "くる", NONE, VK),
        ],
    },
    DeinflectionRuleGroup {
        name: "polite",
        rules: &[
            r("ます", "る", NONE, V1),
            r("います", "う", NONE, V5),
            r("きます", "く", NONE, V5),
            r("ぎます", "ぐ", NONE, V5),
            r("します", "す", NONE, V5),
            r("します", "する", NONE, VS),
            r("ちます", "つ", NONE, V5),
            r("にます", "ぬ", NONE, V5),
            r("びます", "ぶ", NONE, V5),
            r("みます", "む", NONE, V5),
            r("ります", "る", NONE, V5),
            r("きます", "くる", NONE, VK),
        ],
    },
    DeinflectionRuleGroup {
        name: "polite negative",
        rules: &[
            r("ません", "る", NONE, V1),
            r("いません", "う", NONE, V5),
            r("きません", "く", NONE, V5),
            r("ぎません", "ぐ", NONE, V5),
            r("しません", "す", NONE, V5),
            r("しません", "する", NONE, VS),
            r("ちません", "つ", NONE, V5),
            r("にません", "ぬ", NONE, V5),
            r("びません", "ぶ", NONE, V5),
            r("みません", "む", NONE, V5),
            r("りません", "る", NONE, V5),
            r("きません", "くる", NONE, VK),
        ],
    },
    DeinflectionRuleGroup {
        name: "polite past",
        rules: &[
            r("ました", "る", NONE, V1),
            r("いました", "う", NONE, V5),
            r("きました", "く", NONE, V5),
            r("ぎました", "ぐ", NONE, V5),
            r("しました", "す", NONE, V5),
            r("しました", "する", NONE, VS),
            r("ちました", "つ", NONE, V5),
            r("にました", "ぬ", NONE, V5),
            r("びました", "ぶ", NONE, V5),
            r("みました", "む", NONE, V5),
            r("りました", "る", NONE, V5),
            r("きました", "くる", NONE, VK),
        ],
    },
    DeinflectionRuleGroup {
        name: "polite past negative",
        rules: &[
            r("ませんでした", "る", NONE, V1),
            r("いませんでした", "う", NONE, V5),
            r("きませんでした", "く", NONE, V5),
            r("ぎませんでした", "ぐ", NONE, V5),
            r("しませんでした", "す", NONE, V5),
            r("しませんでした", "する", NONE, VS),
            r("ちませんでした", "つ", NONE, V5),
            r("みませんでした", "む", NONE, V5),
            r("りませんでした", "る", NONE, V5),
            r("きませんでした", "くる", NONE, VK),
        ],
    },
    DeinflectionRuleGroup {
        name: "polite volitional",
        rules: &[
            r("ましょう", "る", NONE, V1),
            r("いましょう", "う", NONE, V5),
            r("きましょう", "く", NONE, V5),
            r("しましょう", "す", NONE, V5),
            r("しましょう", "する", NONE, VS),
            r("みましょう", "む", NONE, V5),
            r("りましょう", "る", NONE, V5),
            r("きましょう", "くる", NONE, VK),
        ],
    },
    DeinflectionRuleGroup {
        name: "potential",
        rules: &[
            r("える", "う", NONE, V5),
            r("ける", "く", NONE, V5),
            r("げる", "ぐ", NONE, V5),
            r("せる", "す", NONE, V5),
            r("てる", "つ", NONE, V5),
            r("ねる", "ぬ", NONE, V5),
            r("べる", "ぶ", NONE, V5),
            r("める", "む", NONE, V5),
            r("れる", "る", NONE, V5),
            r("できる", "する", NONE, VS),
        ],
    },
    DeinflectionRuleGroup {
        name: "potential or passive",
        rules: &[
            r("られる", "る", NONE, V1),
            r("こられる", "くる", NONE, VK),
        ],
    },
    DeinflectionRuleGroup {
        name: "volitional",
        rules: &[
            r("よう", "る", NONE, V1),
            r("おう", "う", NONE, V5),
            r("こう", "く", NONE, V5),
            r("ごう", "ぐ", NONE, V5),
            r("そう", "す", NONE, V5),
            r("とう", "つ", NONE, V5),
            r("のう", "ぬ", NONE, V5),
            r("ぼう", "ぶ", NONE, V5),
            r("もう", "む", NONE, V5),
            r("ろう", "る", NONE, V5),
            r("しよう", "する", NONE, VS),
            r("こよう", "くる", NONE, VK),
        ],
    },
];
