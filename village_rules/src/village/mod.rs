//! The village of Hollowmere: seed-driven layout and authored days.
//!
//! The layout itself is fixed. The seed only decides which villager receives
//! the day-two vision.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::entities::{Cinematic, DayContent, DialogueNode, DialogueOption, House, HouseId, Npc, Position};
use crate::error::RulesError;
use crate::mechanics::{DialogueAction, HouseKind, HouseStatus};

pub const GUARD_HOUSE: &str = "house_guard";
pub const SUMMONING_HOUSE: &str = "house_summoning";

/// A village loaded from authored JSON instead of the built-in layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VillageScript {
    pub houses: Vec<House>,
}

impl VillageScript {
    pub fn from_json(source: &str) -> Result<Self, RulesError> {
        Ok(serde_json::from_str(source)?)
    }
}

/// Generated village plus the seeded choices made while building it.
#[derive(Debug, Clone)]
pub struct Village {
    pub seed: u64,
    pub houses: Vec<House>,
    /// Villager that shows a vision instead of small talk on day two.
    pub vision_house: Option<HouseId>,
}

/// Case-log line shown for a day.
pub fn case_log(day: u32) -> &'static str {
    match day {
        1 => "Day 1: Kabir is missing. The villagers are scared. Investigate everyone.",
        2 => "Day 2: Vikram has been found dead. But he was seen yesterday. Accuse only when sure.",
        3 => "Day 3: Diya is dead. The skinwalker is mimicking us perfectly. Trust no one.",
        _ => "Survive.",
    }
}

fn interview(greeting: &str, topics: &[(&str, &str)]) -> DialogueNode {
    let mut node = DialogueNode::new(greeting);
    for (label, response) in topics {
        node = node.with_option(DialogueOption::new(*label).with_response(*response));
    }
    node.with_option(DialogueOption::new("Let me ask you something.").with_action(DialogueAction::Chat))
        .with_option(DialogueOption::new("Leave."))
}

fn villager(id: &str, name: &str, portrait: &str, position: Position, texture: &str, day_one: DialogueNode) -> House {
    House::new(id, HouseKind::Villager, position)
        .with_texture(texture)
        .with_aftermath(Cinematic::new(
            format!("/assets/aftermath/{id}.png"),
            "The door hangs open. Nobody answers.",
        ))
        .with_day(1, DayContent::new().with_npc(Npc::new(name, portrait, day_one)))
}

fn missing_woodcutter() -> House {
    House::new("house_6", HouseKind::Villager, Position::new(420.0, 360.0))
        .with_texture("house6")
        .with_aftermath(Cinematic::new(
            "/assets/aftermath/house_6.png",
            "Kabir's bed has not been slept in. His axe is gone.",
        ))
        .with_day(1, DayContent::new().with_status(HouseStatus::Missing))
}

fn guard_house() -> House {
    let orders = DialogueNode::new("Then speak. Who wears a stolen face?")
        .with_option(DialogueOption::new("I am ready to name them.").with_action(DialogueAction::Eliminate))
        .with_option(DialogueOption::new("Not yet."));

    let greeting = DialogueNode::new("Halt. Another night is coming. What do you need?")
        .with_option(
            DialogueOption::new("What do you know?")
                .with_response("Interrogate the villagers. Find out whose skin the demon wears.")
                .with_next(orders),
        )
        .with_option(DialogueOption::new("I need to rest.").with_action(DialogueAction::Sleep))
        .with_option(DialogueOption::new("Leave.").with_action(DialogueAction::Close));

    House::new(GUARD_HOUSE, HouseKind::Guard, Position::new(520.0, 220.0))
        .with_texture("house1")
        .with_day(
            1,
            DayContent::new().with_npc(Npc::new("Guard Captain Holt", "/assets/portraits/guard.png", greeting)),
        )
}

fn summoning_circle() -> House {
    House::new(SUMMONING_HOUSE, HouseKind::SpecialEvent, Position::new(980.0, 260.0))
        .with_texture("house2")
        .with_day(
            1,
            DayContent::new().with_cinematic(Cinematic::new(
                "/assets/cinematics/summoning_day1.png",
                "A faint hum echoes from the circle. Something is watching...",
            )),
        )
}

/// Build the village for `seed`.
pub fn generate_village(seed: u64) -> Village {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let miller = villager(
        "house_1",
        "Ishaan the Miller",
        "/assets/portraits/miller.png",
        Position::new(220.0, 240.0),
        "house1",
        interview(
            "Arrey, close the door behind you! Did you see Kabir out there?",
            &[
                ("When did you last see Kabir?", "Yesterday at dusk, by the forest edge. Staring at nothing."),
                ("What do you think happened?", "A rakshasa, bhai. I am telling you."),
            ],
        ),
    )
    .with_day(
        2,
        DayContent::new().with_npc(Npc::new(
            "Ishaan the Miller",
            "/assets/portraits/miller.png",
            interview(
                "Vikram is dead. If the hunter can die, we are all sheep.",
                &[("Did you hear anything?", "Screams. I did not open the door. Forgive me.")],
            ),
        )),
    );

    let herbalist_day_one = DialogueNode::new("Come in, ji. You look like you have not slept.")
        .with_option(
            DialogueOption::new("Did Kabir visit you?")
                .with_response("He came for sleeplessness. But he spoke of shedding his skin.")
                .with_next(
                    DialogueNode::new("He asked if herbs could make him forget his own name.")
                        .with_option(DialogueOption::new("That is not sickness.").with_response(
                            "No. He was not sick in the body. He was sick in the soul.",
                        ))
                        .with_option(DialogueOption::new("Leave.")),
                ),
        )
        .with_option(DialogueOption::new("Let me ask you something.").with_action(DialogueAction::Chat))
        .with_option(DialogueOption::new("Leave."));

    let herbalist = villager(
        "house_2",
        "Anya the Herbalist",
        "/assets/portraits/herbalist.png",
        Position::new(300.0, 520.0),
        "house2",
        herbalist_day_one,
    )
    .with_day(
        3,
        DayContent::new().with_npc(Npc::new(
            "Anya the Herbalist",
            "/assets/portraits/herbalist.png",
            interview(
                "I am brewing poisons now, not medicine.",
                &[("What did Diya tell you?", "She saw someone walking wrong the other night.")],
            ),
        )),
    );

    let hunter = villager(
        "house_3",
        "Vikram the Hunter",
        "/assets/portraits/hunter.png",
        Position::new(620.0, 560.0),
        "house1",
        interview(
            "Hmph. Make it quick.",
            &[("You suspected Kabir?", "He moved like a predator, not a man. I should have loosed an arrow.")],
        ),
    )
    .with_aftermath(Cinematic::new(
        "/assets/aftermath/house_3.png",
        "Vikram's bow lies unstrung. The floor is scored with claw marks.",
    ))
    .with_day(2, DayContent::new().with_status(HouseStatus::Dead));

    let weaver = villager(
        "house_4",
        "Diya the Weaver",
        "/assets/portraits/weaver.png",
        Position::new(880.0, 700.0),
        "house2",
        interview(
            "Oh! You startled me.",
            &[("What did Kabir ask you?", "When people sleep. When the guards change.")],
        ),
    )
    .with_day(3, DayContent::new().with_status(HouseStatus::Dead));

    let elder = villager(
        "house_5",
        "Amar the Elder",
        "/assets/portraits/elder.png",
        Position::new(760.0, 400.0),
        "house1",
        interview(
            "Sit, beta. My eyes are gone, but I see enough.",
            &[("What is hunting us?", "A skinwalker. It wears its victims to hide in plain sight.")],
        ),
    )
    .with_day(
        3,
        DayContent::new().with_npc(Npc::new(
            "Amar the Elder",
            "/assets/portraits/elder.png",
            interview(
                "The circle closes.",
                &[("Who should I trust?", "No one. Not even me.")],
            ),
        )),
    );

    let mut houses = vec![
        summoning_circle(),
        guard_house(),
        miller,
        herbalist,
        hunter,
        weaver,
        elder,
        missing_woodcutter(),
    ];

    // Only villagers still standing on day two can have the vision.
    let candidates: Vec<HouseId> = houses
        .iter()
        .filter(|h| h.is_villager() && h.resolve_content(2).status.unwrap_or_default().is_present())
        .map(|h| h.id.clone())
        .collect();
    let vision_house = candidates.choose(&mut rng).cloned();

    if let Some(id) = &vision_house {
        if let Some(house) = houses.iter_mut().find(|h| &h.id == id) {
            let day_two = house.content_by_day.remove(&2).unwrap_or_default();
            house.content_by_day.insert(
                2,
                day_two.with_cinematic(Cinematic::new(
                    "/assets/cinematics/day2_house_vision.png",
                    "A sudden vision flashes behind your eyes... something changed overnight.",
                )),
            );
        }
    }

    Village {
        seed,
        houses,
        vision_house,
    }
}
