//! Built-in English story set.

use crate::domain::{Story, VocabularyEntry, WordTimestamp};

fn vocab(entries: &[(&str, &str)]) -> Vec<VocabularyEntry> {
    entries
        .iter()
        .map(|(word, definition)| VocabularyEntry {
            word: word.to_string(),
            definition: definition.to_string(),
        })
        .collect()
}

fn cues(spans: &[(&str, f64, f64)]) -> Vec<WordTimestamp> {
    spans
        .iter()
        .map(|&(word, start, end)| WordTimestamp {
            word: word.to_string(),
            start,
            end,
        })
        .collect()
}

pub fn english_stories() -> Vec<Story> {
    vec![
        Story {
            id: 1,
            title: "Bunny's Big Day".to_string(),
            description: "A little bunny learns about courage and friendship".to_string(),
            content: "Once upon a time, there was a little bunny named Fluffy. Fluffy was very shy and afraid of everything. One day, Fluffy saw a little mouse who was stuck in a puddle. The mouse was crying and needed help. Fluffy was scared, but she remembered what her mother always said: 'Being brave means doing the right thing even when you're afraid.' So Fluffy took a deep breath and helped the mouse out of the puddle. The mouse was so happy and thanked Fluffy. From that day on, Fluffy and the mouse became the best of friends. Fluffy learned that being brave makes you feel good and helps others too!".to_string(),
            vocabulary: vocab(&[
                ("brave", "Having courage and strength"),
                ("friend", "Someone you like and trust"),
                ("help", "To assist or support someone"),
            ]),
            illustration: "🐰".to_string(),
            audio_url: "stories/bunny.mp3".to_string(),
            timestamps: cues(&[
                ("Once", 0.0, 0.4),
                ("upon", 0.4, 0.75),
                ("a", 0.75, 0.85),
                ("time", 0.85, 1.3),
                ("there", 1.5, 1.75),
                ("was", 1.75, 1.95),
                ("a", 1.95, 2.05),
                ("little", 2.05, 2.4),
                ("bunny", 2.4, 2.8),
                ("named", 2.8, 3.1),
                ("Fluffy", 3.1, 3.7),
            ]),
        },
        Story {
            id: 2,
            title: "Bear's Honey Hunt".to_string(),
            description: "A hungry bear discovers the value of sharing".to_string(),
            content: "There was a big brown bear named Bruno who loved honey more than anything. One morning, Bruno was very hungry and went looking for honey. He found a huge beehive full of delicious honey! Bruno was so excited that he wanted to eat it all by himself. But then he saw a little bird sitting nearby, looking sad and hungry. Bruno remembered how his mother taught him to be kind and share. So Bruno decided to share his honey with the little bird. The bird was so happy and thanked Bruno. Bruno discovered that sharing his honey made him feel even happier than eating it all alone!".to_string(),
            vocabulary: vocab(&[
                ("hungry", "Wanting to eat food"),
                ("share", "To give part of what you have to others"),
                ("kind", "Being nice and helpful to others"),
            ]),
            illustration: "🐻".to_string(),
            audio_url: "stories/bear.mp3".to_string(),
            timestamps: cues(&[
                ("There", 0.0, 0.3),
                ("was", 0.3, 0.5),
                ("a", 0.5, 0.6),
                ("big", 0.6, 0.9),
                ("brown", 0.9, 1.25),
                ("bear", 1.25, 1.6),
                ("named", 1.6, 1.9),
                ("Bruno", 1.9, 2.4),
                ("who", 2.5, 2.7),
                ("loved", 2.7, 3.0),
                ("honey", 3.0, 3.4),
                ("more", 3.4, 3.65),
                ("than", 3.65, 3.85),
                ("anything", 3.85, 4.5),
            ]),
        },
        Story {
            id: 3,
            title: "Fox's Clever Trick".to_string(),
            description: "A clever fox learns that honesty is the best policy".to_string(),
            content: "Red the fox was known as the cleverest animal in the forest. He could solve any problem and always had a trick up his sleeve. One day, Red found a basket of apples that belonged to Farmer Brown. Red was very hungry and wanted to take the apples. But then he remembered what his grandfather always said: 'Being clever is good, but being honest is better.' Red decided to be honest and not take the apples. Instead, he helped Farmer Brown by warning him about a storm coming. Farmer Brown was so grateful that he gave Red some apples as a thank you gift. Red learned that being honest and helpful brings better rewards than being tricky!".to_string(),
            vocabulary: vocab(&[
                ("clever", "Smart and quick to learn"),
                ("honest", "Telling the truth and not lying"),
                ("truth", "What really happened or what is real"),
            ]),
            illustration: "🦊".to_string(),
            audio_url: "stories/fox.mp3".to_string(),
            timestamps: cues(&[
                ("Red", 0.0, 0.35),
                ("the", 0.35, 0.5),
                ("fox", 0.5, 0.9),
                ("was", 0.9, 1.1),
                ("known", 1.1, 1.4),
                ("as", 1.4, 1.55),
                ("the", 1.55, 1.7),
                ("cleverest", 1.7, 2.3),
                ("animal", 2.3, 2.7),
                ("in", 2.7, 2.8),
                ("the", 2.8, 2.95),
                ("forest", 2.95, 3.5),
            ]),
        },
    ]
}
