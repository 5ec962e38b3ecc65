//! Cotton trivia for the fact card.

use rand::seq::SliceRandom;
use rand::Rng;

static FACTS: &[&str] = &[
    "Cotton is a natural fiber that grows on the seed of the cotton plant.",
    "There are over 50 species of cotton, but only four are commercially cultivated.",
    "India is one of the largest producers of cotton in the world.",
    "Cotton fibers are made of cellulose, a carbohydrate that gives them strength and durability.",
    "Cotton was domesticated independently in both the Old and New Worlds.",
    "The cotton gin, invented by Eli Whitney in 1793, revolutionized cotton processing.",
    "Cotton can absorb up to 27 times its weight in water.",
    "Cottonseed is used to make oil, animal feed, and even cosmetics.",
    "Egyptian cotton is known for its long fibers and luxurious feel.",
    "Cotton is biodegradable and recyclable, making it environmentally friendly.",
    "The word 'cotton' comes from the Arabic word 'qutn'.",
    "Cotton farming supports the livelihood of over 250 million people worldwide.",
    "Cotton is used in making textiles, medical supplies, and even currency paper.",
    "Denim jeans are traditionally made from cotton twill fabric.",
    "Cotton breathes well and is hypoallergenic, making it ideal for clothing.",
    "Cotton lint refers to the white fiber used to make fabric.",
    "Gossypium hirsutum accounts for about 90% of global cotton production.",
    "Cotton grows best in warm climates with adequate rainfall.",
    "Cotton bolls burst open when mature, revealing fluffy fibers.",
    "India, China, the USA, and Pakistan are top cotton producers.",
    "Cotton has been cultivated for over 7,000 years.",
    "Organic cotton is grown without synthetic chemicals or pesticides.",
    "Cotton is used in making bandages and gauze due to its absorbency.",
    "Cotton has high tensile strength, making it durable in fabrics.",
    "Mercerization is a process that improves the luster and dye affinity of cotton.",
    "Cotton is a renewable resource and can be grown annually.",
    "Cottonseed hulls are used as livestock feed.",
    "The largest consumers of cotton are China and India.",
    "Cotton fabrics are soft, strong, and breathable.",
    "Cotton flowers are typically white or yellow and bloom for a single day.",
];

pub fn facts() -> &'static [&'static str] {
    FACTS
}

/// Draw one fact uniformly at random. Each draw is independent.
pub fn random_fact<R: Rng + ?Sized>(rng: &mut R) -> &'static str {
    // FACTS is non-empty, checked in tests
    FACTS.choose(rng).copied().unwrap_or(FACTS[0])
}
