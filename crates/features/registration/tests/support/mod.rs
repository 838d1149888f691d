use serde_json::{Value, json};

pub fn submission(roll_number: i64, email: &str) -> Value {
    json!({
        "name": "Grace Hopper",
        "roll_number": roll_number,
        "gender": "F",
        "email": email,
        "about": "Compilers, \"bugs\" and COBOL",
        "team_name": "Navy",
        "github_link": ""
    })
}
