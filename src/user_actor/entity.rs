use crate::actor_framework::Entity;
use crate::domain::{User, UserCreate, UserUpdate};
use crate::events::UserEvent;
use super::actions::UserAction;
use super::error::UserError;

impl Entity for User {
    type Id = u64;
    type CreateParams = UserCreate;
    type Patch = UserUpdate;
    type Action = UserAction;
    type ActionResult = User;
    type Event = UserEvent;
    type Error = UserError;

    /// Creates a new User from creation parameters.
    ///
    /// # Errors
    /// `InfoParamsInvalid` when `id` is zero; such a user is never stored.
    fn from_create_params(id: u64, params: UserCreate) -> Result<Self, UserError> {
        if id == 0 {
            return Err(UserError::InfoParamsInvalid);
        }
        Ok(Self {
            id,
            phone: params.phone,
            score: params.score,
        })
    }

    fn already_exists(id: &u64) -> UserError {
        UserError::AlreadyExists(*id)
    }

    fn not_found(id: &u64) -> UserError {
        UserError::NotExists(*id)
    }

    /// Overwrites phone and score.
    fn on_update(&mut self, patch: UserUpdate) -> Result<(), UserError> {
        self.phone = patch.phone;
        self.score = patch.score;
        Ok(())
    }

    fn created_event(&self) -> UserEvent {
        UserEvent::UserCreated(self.clone())
    }

    fn updated_event(&self) -> UserEvent {
        UserEvent::UserUpdated(self.clone())
    }

    /// Handles score actions, returning the post-change record.
    ///
    /// # Actions
    /// - `ChargeScore(amount)`: adds `amount`, rejecting integer overflow
    /// - `DebitScore(amount)`: subtracts `amount` if the balance covers it
    fn handle_action(&mut self, action: UserAction) -> Result<(User, UserEvent), UserError> {
        match action {
            UserAction::ChargeScore(amount) => {
                self.score = self
                    .score
                    .checked_add(amount)
                    .ok_or(UserError::ScoreOverflow(self.id))?;
                let event = UserEvent::ScoreCharged {
                    id: self.id,
                    amount,
                    score: self.score,
                };
                Ok((self.clone(), event))
            }
            UserAction::DebitScore(amount) => {
                if self.score < amount {
                    return Err(UserError::NotEnoughScore {
                        id: self.id,
                        score: self.score,
                        required: amount,
                    });
                }
                self.score -= amount;
                let event = UserEvent::ScoreDebited {
                    id: self.id,
                    amount,
                    score: self.score,
                };
                Ok((self.clone(), event))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_id_is_rejected() {
        let result = User::from_create_params(0, UserCreate::new(0, 18999999999, 0));
        assert_eq!(result, Err(UserError::InfoParamsInvalid));
    }

    #[test]
    fn update_overwrites_instead_of_adding() {
        let mut user = User::new(1, 18999999999, 50);
        user.on_update(UserUpdate { phone: 18000000000, score: 100 }).unwrap();
        assert_eq!(user, User::new(1, 18000000000, 100));
    }

    #[test]
    fn charge_is_additive() {
        let mut user = User::new(1, 18888888888, 900);
        let (after, event) = user.handle_action(UserAction::ChargeScore(100)).unwrap();
        assert_eq!(after.score, 1000);
        assert_eq!(event, UserEvent::ScoreCharged { id: 1, amount: 100, score: 1000 });
    }

    #[test]
    fn charge_rejects_overflow() {
        let mut user = User::new(1, 18888888888, u64::MAX);
        let result = user.handle_action(UserAction::ChargeScore(1));
        assert_eq!(result, Err(UserError::ScoreOverflow(1)));
    }

    #[test]
    fn debit_requires_enough_score() {
        let mut user = User::new(1, 18888888888, 900);
        let result = user.handle_action(UserAction::DebitScore(1000));
        assert_eq!(
            result,
            Err(UserError::NotEnoughScore { id: 1, score: 900, required: 1000 })
        );
        assert_eq!(user.score, 900);

        let (after, _) = user.handle_action(UserAction::DebitScore(900)).unwrap();
        assert_eq!(after.score, 0);
    }
}
