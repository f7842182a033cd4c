#[cfg(feature = "contract")]
mod contract_impl {
    use chatbox_common::board::{BoardParameters, BoardSummary, BoardUpdate, MessageBoard};
    use freenet_stdlib::prelude::*;

    pub struct Contract;

    /// Merge a full replica state into `board` after structural validation.
    fn merge_validated(board: &mut MessageBoard, bytes: &[u8]) -> Result<(), ContractError> {
        if bytes.is_empty() {
            return Ok(());
        }
        let incoming: MessageBoard =
            serde_json::from_slice(bytes).map_err(|e| ContractError::Deser(e.to_string()))?;
        if !incoming.validate() {
            return Err(ContractError::InvalidUpdate);
        }
        board.merge(incoming);
        Ok(())
    }

    /// Apply a delta to `board`.
    ///
    /// A delta is either a batch of relayed operations (JSON array of
    /// [`BoardUpdate`]) or a full replica state as produced by
    /// `get_state_delta` (JSON object), merged like any other state.
    fn apply_delta(
        board: &mut MessageBoard,
        params: &BoardParameters,
        bytes: &[u8],
    ) -> Result<(), ContractError> {
        if bytes.is_empty() {
            return Ok(());
        }
        if let Ok(updates) = serde_json::from_slice::<Vec<BoardUpdate>>(bytes) {
            for update in updates {
                board
                    .apply(&params.domain, update)
                    .map_err(|_| ContractError::InvalidUpdate)?;
            }
            return Ok(());
        }
        merge_validated(board, bytes)
    }

    #[contract]
    impl ContractInterface for Contract {
        fn validate_state(
            _parameters: Parameters<'static>,
            state: State<'static>,
            _related: RelatedContracts<'static>,
        ) -> Result<ValidateResult, ContractError> {
            let bytes = state.as_ref();
            if bytes.is_empty() {
                return Ok(ValidateResult::Valid);
            }

            let board: MessageBoard =
                serde_json::from_slice(bytes).map_err(|e| ContractError::Deser(e.to_string()))?;

            if !board.validate() {
                return Ok(ValidateResult::Invalid);
            }

            Ok(ValidateResult::Valid)
        }

        fn update_state(
            parameters: Parameters<'static>,
            state: State<'static>,
            data: Vec<UpdateData<'static>>,
        ) -> Result<UpdateModification<'static>, ContractError> {
            let params: BoardParameters = serde_json::from_slice(parameters.as_ref())
                .map_err(|e| ContractError::Deser(e.to_string()))?;

            let mut board = if state.is_empty() {
                MessageBoard::new()
            } else {
                serde_json::from_slice(state.as_ref())
                    .map_err(|e| ContractError::Deser(e.to_string()))?
            };

            for ud in data {
                match ud {
                    UpdateData::State(s) => {
                        merge_validated(&mut board, s.as_ref())?;
                    }
                    UpdateData::Delta(d) => {
                        apply_delta(&mut board, &params, d.as_ref())?;
                    }
                    UpdateData::StateAndDelta { state, delta } => {
                        merge_validated(&mut board, state.as_ref())?;
                        apply_delta(&mut board, &params, delta.as_ref())?;
                    }
                    _ => return Err(ContractError::InvalidUpdate),
                }
            }

            let serialized =
                serde_json::to_vec(&board).map_err(|e| ContractError::Other(e.to_string()))?;
            Ok(UpdateModification::valid(State::from(serialized)))
        }

        fn summarize_state(
            _parameters: Parameters<'static>,
            state: State<'static>,
        ) -> Result<StateSummary<'static>, ContractError> {
            if state.is_empty() {
                return Ok(StateSummary::from(vec![]));
            }

            let board: MessageBoard = serde_json::from_slice(state.as_ref())
                .map_err(|e| ContractError::Deser(e.to_string()))?;

            let summary = board.summarize();
            let serialized =
                serde_json::to_vec(&summary).map_err(|e| ContractError::Other(e.to_string()))?;
            Ok(StateSummary::from(serialized))
        }

        fn get_state_delta(
            _parameters: Parameters<'static>,
            state: State<'static>,
            summary: StateSummary<'static>,
        ) -> Result<StateDelta<'static>, ContractError> {
            if state.is_empty() {
                return Ok(StateDelta::from(vec![]));
            }

            let board: MessageBoard = serde_json::from_slice(state.as_ref())
                .map_err(|e| ContractError::Deser(e.to_string()))?;

            let summary: BoardSummary = if summary.is_empty() {
                BoardSummary::default()
            } else {
                serde_json::from_slice(summary.as_ref())
                    .map_err(|e| ContractError::Deser(e.to_string()))?
            };

            let delta_bytes = match board.delta(&summary) {
                Some(delta) => {
                    serde_json::to_vec(&delta).map_err(|e| ContractError::Other(e.to_string()))?
                }
                None => vec![],
            };
            Ok(StateDelta::from(delta_bytes))
        }
    }
}
