//! Integration test for text rendering and input parsing.

use delverogue::{
    render_text, Direction, Engine, Glyph, InputHandler, Observation, Player, PlayerInput,
    RogueResult, TextDisplay,
};

#[test]
fn test_render_text_shape() -> RogueResult<()> {
    let engine = Engine::new(Player::new(), 12345, true)?;
    let text = render_text(&engine, true);
    let lines: Vec<&str> = text.lines().collect();

    // One line per map row plus the status line
    assert_eq!(lines.len(), engine.level().height as usize + 1);
    for line in &lines[..lines.len() - 1] {
        assert_eq!(line.chars().count(), engine.level().width as usize);
    }
    assert_eq!(lines[lines.len() - 1], "HP: 20/20  Depth: 1  Gold: 0  Potions: 0");

    let players = text.chars().filter(|ch| *ch == '@').count();
    assert_eq!(players, 1);
    assert_eq!(text.chars().filter(|ch| *ch == '>').count(), 1);

    Ok(())
}

#[test]
fn test_text_agrees_with_observation() -> RogueResult<()> {
    let engine = Engine::new(Player::new(), 777, true)?;

    for perfect_info in [true, false] {
        let text = render_text(&engine, perfect_info);
        let observation = Observation::capture(&engine, perfect_info);

        for (y, line) in text.lines().take(engine.level().height as usize).enumerate() {
            for (x, ch) in line.chars().enumerate() {
                let glyph = Glyph::from_char(ch).expect("rendered glyph is known");
                assert_eq!(observation.get(x, y), Some(glyph.code()));
            }
        }
    }

    Ok(())
}

#[test]
fn test_imperfect_view_hides_unexplored_tiles() -> RogueResult<()> {
    let engine = Engine::new(Player::new(), 4040, true)?;
    let perfect = render_text(&engine, true);
    let partial = render_text(&engine, false);

    let blanks = |text: &str| text.chars().filter(|ch| *ch == ' ').count();
    assert!(blanks(&partial) > blanks(&perfect));
    assert!(partial.contains('@'));

    Ok(())
}

#[test]
fn test_display_keeps_recent_messages_and_reports_the_end() -> RogueResult<()> {
    let mut engine = Engine::new(Player::new(), 99, true)?;
    let mut display = TextDisplay::new(false);
    for i in 0..8 {
        display.add_message(format!("message {}", i));
    }
    assert_eq!(display.messages.len(), display.max_messages);
    assert_eq!(display.messages[0], "message 3");

    while !engine.is_terminal() {
        let result = engine.step_index(9)?;
        display.record_events(&result.events);
    }
    assert!(display.render(&engine).contains("Game over"));

    Ok(())
}

#[test]
fn test_input_handler_commands() -> RogueResult<()> {
    let input_handler = InputHandler::new();

    assert_eq!(
        input_handler.parse_line("dd")?,
        vec![
            PlayerInput::Move(Direction::East),
            PlayerInput::Move(Direction::East)
        ]
    );
    assert_eq!(input_handler.parse_line("2")?, vec![PlayerInput::Action(2)]);
    assert_eq!(input_handler.parse_line("auto")?, vec![PlayerInput::ToggleAutoplay]);
    assert_eq!(input_handler.parse_line("")?, Vec::new());

    Ok(())
}

#[test]
fn test_unknown_keys_are_rejected() {
    let input_handler = InputHandler::new();
    assert!(input_handler.parse_line("dxd").is_err());
}
