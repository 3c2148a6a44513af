use minesweeper_logic as ms;
use wasm_bindgen::prelude::*;

const HIDDEN: i8 = -1;
const FLAGGED: i8 = -2;
const DETONATED: i8 = -3;

#[wasm_bindgen]
pub fn create_game(height: u8, width: u8, mines: u8) -> Result<Vec<u8>, String> {
    console_error_panic_hook::set_once();

    let config = ms::GameConfig::new(height as usize, width as usize, mines as usize);
    let game = ms::Game::new(&config).map_err(|e| e.to_string())?;
    game.to_bytes().map_err(|e| e.to_string())
}

/// Lets the agent make one move.
#[wasm_bindgen]
pub fn play_turn(bts: Vec<u8>) -> Result<Vec<u8>, String> {
    console_error_panic_hook::set_once();

    let mut game = ms::Game::from_bytes(&bts).map_err(|e| e.to_string())?;
    game.play_turn(&mut rand::rng()).map_err(|e| e.to_string())?;
    game.to_bytes().map_err(|e| e.to_string())
}

/// Reveals a cell chosen by the user.
#[wasm_bindgen]
pub fn reveal(bts: Vec<u8>, row: usize, col: usize) -> Result<Vec<u8>, String> {
    console_error_panic_hook::set_once();

    let mut game = ms::Game::from_bytes(&bts).map_err(|e| e.to_string())?;
    game.reveal(ms::Cell { row, col })
        .map_err(|e| e.to_string())?;
    game.to_bytes().map_err(|e| e.to_string())
}

/// 0 while playing, 1 once won, 2 once lost.
#[wasm_bindgen]
pub fn game_state(bts: Vec<u8>) -> Result<u8, String> {
    console_error_panic_hook::set_once();

    let game = ms::Game::from_bytes(&bts).map_err(|e| e.to_string())?;
    Ok(match game.state {
        ms::GameState::Playing => 0,
        ms::GameState::Won => 1,
        ms::GameState::Lost => 2,
    })
}

/// Row-major player view: -1 hidden, -2 flagged, -3 the detonated mine, 0-8 revealed.
#[wasm_bindgen]
pub fn get_cells(bts: Vec<u8>) -> Result<Vec<i8>, String> {
    console_error_panic_hook::set_once();

    let game = ms::Game::from_bytes(&bts).map_err(|e| e.to_string())?;
    Ok(game
        .board
        .cells()
        .map(|cell| {
            if game.detonated == Some(cell) {
                DETONATED
            } else if game.agent.moves_made().contains(&cell) {
                game.board.adjacent_mine_count(cell) as i8
            } else if game.board.mines_found().contains(&cell) {
                FLAGGED
            } else {
                HIDDEN
            }
        })
        .collect())
}
